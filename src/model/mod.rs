//! Snapshot Model
//!
//! In-memory representation of one schema's entities (Schema, ObjectType,
//! Attribute), built from the three captured snapshot documents. Construction
//! validates the document set before any remote call is made: descriptors must
//! carry id and name, every parent reference must resolve within the same
//! schema and be acyclic, and every attribute must belong to an object type
//! present in the document set.

use crate::api::types::{AttributeDescriptor, ObjectTypeDescriptor, SchemaDescriptor};
use crate::core::{InsightError, Result};
use std::collections::{HashMap, HashSet};

/// One schema from a snapshot, with its object types in document order.
///
/// `api_id` is the identifier of this schema in the *target* system. It is
/// unset on construction and bound exactly once, after the schema has been
/// found or created remotely. It may differ from `id`, the identifier the
/// schema had when the snapshot was captured.
#[derive(Debug, Clone)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub key: String,
    pub description: String,
    pub api_id: Option<String>,
    pub object_types: Vec<ObjectType>,
}

/// An object type from a snapshot. `parent_id` refers to another object type
/// in the same schema by its snapshot identifier; absence marks a tree root.
#[derive(Debug, Clone)]
pub struct ObjectType {
    pub id: String,
    pub name: String,
    pub icon_id: String,
    pub parent_id: Option<String>,
    pub api_id: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// Attribute type discriminator for primitive attributes.
pub const ATTRIBUTE_TYPE_DEFAULT: i64 = 0;
/// Attribute type discriminator for object references.
pub const ATTRIBUTE_TYPE_REFERENCE: i64 = 1;

/// A captured attribute. Read-only snapshot data; only consulted to build
/// creation payloads.
///
/// For `attribute_type` 0 the `default_type_id` payload field applies; for
/// type 1 the `ref_*` fields point at an object type that may live in a
/// different schema of the same restore batch.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub id: String,
    pub name: String,
    pub description: String,
    pub object_type_name: String,
    pub label: bool,
    pub attribute_type: i64,
    pub default_type_id: Option<String>,
    pub ref_object_type_schema_id: Option<String>,
    pub ref_object_type_id: Option<String>,
    pub ref_type_id: Option<String>,
}

impl Attribute {
    pub fn from_descriptor(descriptor: &AttributeDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone().unwrap_or_default(),
            object_type_name: descriptor.object_type.name.clone(),
            label: descriptor.label,
            attribute_type: descriptor.attribute_type,
            default_type_id: descriptor.default_type.as_ref().map(|t| t.id.clone()),
            ref_object_type_schema_id: descriptor
                .reference_object_type
                .as_ref()
                .map(|r| r.object_schema_id.clone()),
            ref_object_type_id: descriptor.reference_object_type.as_ref().map(|r| r.id.clone()),
            ref_type_id: descriptor.reference_type.as_ref().map(|t| t.id.clone()),
        }
    }
}

impl ObjectType {
    pub fn from_descriptor(descriptor: &ObjectTypeDescriptor) -> Result<Self> {
        if descriptor.id.is_empty() || descriptor.name.is_empty() {
            return Err(InsightError::DataIntegrity(format!(
                "object type descriptor missing id or name (id='{}', name='{}')",
                descriptor.id, descriptor.name
            )));
        }
        Ok(Self {
            id: descriptor.id.clone(),
            name: descriptor.name.clone(),
            icon_id: descriptor.icon.id.clone(),
            parent_id: descriptor.parent_object_type_id.clone(),
            api_id: None,
            attributes: Vec::new(),
        })
    }
}

impl Schema {
    /// Build a schema from the three captured documents.
    ///
    /// Attributes are distributed onto their owning object types by the
    /// `objectType.id` field of each attribute descriptor.
    pub fn from_documents(
        schema: &SchemaDescriptor,
        object_types: &[ObjectTypeDescriptor],
        attributes: &[AttributeDescriptor],
    ) -> Result<Self> {
        if schema.id.is_empty() || schema.name.is_empty() {
            return Err(InsightError::DataIntegrity(format!(
                "schema descriptor missing id or name (key='{}')",
                schema.object_schema_key
            )));
        }

        let mut built: Vec<ObjectType> = object_types
            .iter()
            .map(ObjectType::from_descriptor)
            .collect::<Result<_>>()?;

        let ids: HashSet<&str> = built.iter().map(|t| t.id.as_str()).collect();
        if ids.len() != built.len() {
            return Err(InsightError::DataIntegrity(format!(
                "duplicate object type ids in schema '{}'",
                schema.object_schema_key
            )));
        }

        for attribute in attributes {
            let owner_id = attribute.object_type.id.as_str();
            let owner = built
                .iter_mut()
                .find(|t| t.id == owner_id)
                .ok_or_else(|| {
                    InsightError::DataIntegrity(format!(
                        "attribute '{}' references object type '{}' not present in schema '{}'",
                        attribute.name, owner_id, schema.object_schema_key
                    ))
                })?;
            owner.attributes.push(Attribute::from_descriptor(attribute));
        }

        let result = Self {
            id: schema.id.clone(),
            name: schema.name.clone(),
            key: schema.object_schema_key.clone(),
            description: schema.description.clone().unwrap_or_default(),
            api_id: None,
            object_types: built,
        };
        result.validate_parent_graph()?;
        Ok(result)
    }

    /// Look up an object type by its snapshot identifier.
    pub fn object_type(&self, id: &str) -> Option<&ObjectType> {
        self.object_types.iter().find(|t| t.id == id)
    }

    pub fn object_type_mut(&mut self, id: &str) -> Option<&mut ObjectType> {
        self.object_types.iter_mut().find(|t| t.id == id)
    }

    /// Every non-null parent reference must resolve within this schema, and
    /// the induced parent graph must be acyclic.
    fn validate_parent_graph(&self) -> Result<()> {
        let parents: HashMap<&str, Option<&str>> = self
            .object_types
            .iter()
            .map(|t| (t.id.as_str(), t.parent_id.as_deref()))
            .collect();

        for object_type in &self.object_types {
            if let Some(parent_id) = object_type.parent_id.as_deref() {
                if !parents.contains_key(parent_id) {
                    return Err(InsightError::DataIntegrity(format!(
                        "object type '{}' has dangling parent reference '{}' in schema '{}'",
                        object_type.name, parent_id, self.key
                    )));
                }
            }

            // Walk the ancestor chain; revisiting a node means a cycle.
            let mut seen: HashSet<&str> = HashSet::new();
            let mut current = object_type.id.as_str();
            while let Some(&Some(parent_id)) = parents.get(current) {
                if !seen.insert(current) {
                    return Err(InsightError::DataIntegrity(format!(
                        "cycle in object type parent graph at '{}' in schema '{}'",
                        object_type.name, self.key
                    )));
                }
                current = parent_id;
            }
        }
        Ok(())
    }
}

/// The set of schemas restored together in one invocation. Cross-schema
/// references can only be resolved within this batch.
#[derive(Debug, Clone, Default)]
pub struct RestoreBatch {
    schemas: Vec<Schema>,
}

impl RestoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, schema: Schema) {
        self.schemas.push(schema);
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Schema> {
        self.schemas.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Schema> {
        self.schemas.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Schema> {
        self.schemas.get_mut(index)
    }

    /// Find a schema by the identifier it had when its snapshot was captured.
    /// This is the lookup reference attributes use.
    pub fn schema_by_original_id(&self, id: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.id == id)
    }

    pub fn schema_by_key(&self, key: &str) -> Option<&Schema> {
        self.schemas.iter().find(|s| s.key == key)
    }
}
