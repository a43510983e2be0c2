//! Wire types for the Insight workspace REST API.
//!
//! Descriptors mirror the JSON shapes the API returns. Each carries a
//! flattened `extra` map so backed-up documents round-trip verbatim even when
//! the remote adds fields this tool does not interpret.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    pub id: String,
    pub name: String,
    pub object_schema_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeDescriptor {
    pub id: String,
    pub name: String,
    pub icon: IconRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_object_type_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `defaultType` / `referenceType` of an attribute descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: String,
}

/// The owning object type embedded in an attribute descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTypeOwnerRef {
    pub id: String,
    pub name: String,
}

/// `referenceObjectType` of a type-1 attribute: the target object type and
/// the schema it belongs to, both by snapshot-time identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceObjectTypeRef {
    pub id: String,
    pub object_schema_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub label: bool,
    #[serde(rename = "type")]
    pub attribute_type: i64,
    pub object_type: ObjectTypeOwnerRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_object_type: Option<ReferenceObjectTypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<TypeRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `objectschema/list` response page.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaListPage {
    pub values: Vec<SchemaDescriptor>,
}

/// Response of the create endpoints; only the assigned id matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEntity {
    pub id: String,
}

// ============================================================================
// Creation payloads
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchemaPayload {
    pub name: String,
    pub object_schema_key: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectTypePayload {
    pub name: String,
    pub icon_id: String,
    pub object_schema_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_object_type_id: Option<String>,
}

/// Attribute creation payload. Type-0 attributes carry `defaultTypeId`;
/// type-1 attributes carry `typeValue` (live id of the referenced object
/// type) and `additionalValue` (the reference kind).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttributePayload {
    pub name: String,
    pub label: bool,
    pub description: String,
    #[serde(rename = "type")]
    pub attribute_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_descriptor_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "id": "5",
            "name": "Owner",
            "label": false,
            "type": 0,
            "objectType": {"id": "10", "name": "Host"},
            "defaultType": {"id": "0"},
            "editable": true,
            "position": 4
        });

        let descriptor: AttributeDescriptor = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(descriptor.attribute_type, 0);
        assert_eq!(descriptor.default_type.as_ref().unwrap().id, "0");

        let back = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(back["editable"], raw["editable"]);
        assert_eq!(back["position"], raw["position"]);
        assert_eq!(back["type"], raw["type"]);
    }

    #[test]
    fn create_payload_omits_absent_parent() {
        let payload = CreateObjectTypePayload {
            name: "Host".into(),
            icon_id: "13".into(),
            object_schema_id: "7".into(),
            parent_object_type_id: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("parentObjectTypeId").is_none());
        assert_eq!(value["objectSchemaId"], "7");
    }

    #[test]
    fn reference_payload_uses_type_value_and_additional_value() {
        let payload = CreateAttributePayload {
            name: "Linked".into(),
            label: false,
            description: String::new(),
            attribute_type: 1,
            default_type_id: None,
            type_value: Some("42".into()),
            additional_value: Some("1".into()),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["typeValue"], "42");
        assert_eq!(value["additionalValue"], "1");
        assert!(value.get("defaultTypeId").is_none());
    }
}
