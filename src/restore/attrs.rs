//! Attribute Reference Resolver.
//!
//! Creates the attributes of an object type that already carries a live id.
//! The resolver receives the fully resolved restore batch as an explicit
//! read-only parameter: a type-1 attribute may reference an object type in
//! any schema of the batch, so it must only run after every schema's
//! object-type tree has been resolved.

use crate::api::types::CreateAttributePayload;
use crate::api::{SchemaDirectory, SchemaMutation};
use crate::core::{InsightError, Result};
use crate::model::{
    ATTRIBUTE_TYPE_DEFAULT, ATTRIBUTE_TYPE_REFERENCE, Attribute, ObjectType, RestoreBatch,
};
use crate::restore::{RestoreReport, UnknownAttributePolicy};
use std::collections::HashSet;
use tracing::{info, warn};

/// Attributes the remote creates on every object type itself; never
/// recreatable, always filtered out.
pub const BUILTIN_ATTRIBUTES: [&str; 4] = ["Key", "Name", "Created", "Updated"];

pub struct AttributeReferenceResolver<'a, D, M> {
    directory: &'a D,
    mutation: &'a M,
    unknown_policy: UnknownAttributePolicy,
}

impl<'a, D, M> AttributeReferenceResolver<'a, D, M>
where
    D: SchemaDirectory + Sync,
    M: SchemaMutation + Sync,
{
    pub fn new(directory: &'a D, mutation: &'a M, unknown_policy: UnknownAttributePolicy) -> Self {
        Self {
            directory,
            mutation,
            unknown_policy,
        }
    }

    /// Create every missing, non-built-in attribute of `object_type`.
    pub async fn create_for_object_type(
        &self,
        batch: &RestoreBatch,
        object_type: &ObjectType,
        report: &mut RestoreReport,
    ) -> Result<()> {
        let object_type_api_id = object_type.api_id.as_deref().ok_or_else(|| {
            InsightError::Config(format!(
                "object type '{}' has no live id; trees must be resolved before attributes",
                object_type.name
            ))
        })?;

        let mut existing: HashSet<String> = self
            .directory
            .list_attributes(object_type_api_id)
            .await?
            .into_iter()
            .map(|a| a.name)
            .collect();

        for attribute in &object_type.attributes {
            if BUILTIN_ATTRIBUTES.contains(&attribute.name.as_str()) {
                continue;
            }
            if existing.contains(&attribute.name) {
                info!(
                    name = %attribute.name,
                    object_type = %object_type.name,
                    "skip creating attribute, already present"
                );
                report.attributes_skipped += 1;
                continue;
            }
            let Some(payload) = build_payload(attribute, batch, self.unknown_policy)? else {
                report.attributes_skipped += 1;
                continue;
            };
            self.mutation
                .create_attribute(object_type_api_id, &payload)
                .await?;
            // A snapshot can carry duplicate names on one object type; the
            // second occurrence must hit the existence check like a re-run.
            existing.insert(attribute.name.clone());
            info!(
                name = %attribute.name,
                object_type = %object_type.name,
                "created attribute"
            );
            report.attributes_created += 1;
        }
        Ok(())
    }
}

/// Build the creation payload for one attribute, or `None` when its type is
/// not handled and the policy says skip.
pub fn build_payload(
    attribute: &Attribute,
    batch: &RestoreBatch,
    unknown_policy: UnknownAttributePolicy,
) -> Result<Option<CreateAttributePayload>> {
    let mut payload = CreateAttributePayload {
        name: attribute.name.clone(),
        label: attribute.label,
        description: attribute.description.clone(),
        attribute_type: attribute.attribute_type,
        default_type_id: None,
        type_value: None,
        additional_value: None,
    };

    match attribute.attribute_type {
        ATTRIBUTE_TYPE_DEFAULT => {
            payload.default_type_id = attribute.default_type_id.clone();
        }
        ATTRIBUTE_TYPE_REFERENCE => {
            let (type_value, additional_value) = resolve_reference(attribute, batch)?;
            payload.type_value = Some(type_value);
            payload.additional_value = additional_value;
        }
        other => match unknown_policy {
            UnknownAttributePolicy::SkipAndLog => {
                warn!(
                    name = %attribute.name,
                    attribute_type = other,
                    "skipping attribute with unhandled type"
                );
                return Ok(None);
            }
            UnknownAttributePolicy::Fail => {
                return Err(InsightError::DataIntegrity(format!(
                    "attribute '{}' has unhandled type {other}",
                    attribute.name
                )));
            }
        },
    }
    Ok(Some(payload))
}

/// Resolve a type-1 attribute's target to its live object-type id across the
/// whole batch.
fn resolve_reference(
    attribute: &Attribute,
    batch: &RestoreBatch,
) -> Result<(String, Option<String>)> {
    let schema_id = attribute.ref_object_type_schema_id.as_deref().ok_or_else(|| {
        InsightError::DataIntegrity(format!(
            "reference attribute '{}' has no referenceObjectType",
            attribute.name
        ))
    })?;
    let object_type_id = attribute.ref_object_type_id.as_deref().ok_or_else(|| {
        InsightError::DataIntegrity(format!(
            "reference attribute '{}' has no target object type id",
            attribute.name
        ))
    })?;

    let schema = batch.schema_by_original_id(schema_id).ok_or_else(|| {
        InsightError::ReferenceScope(format!(
            "attribute '{}' references schema '{schema_id}' which is not in the restore batch",
            attribute.name
        ))
    })?;
    let target = schema.object_type(object_type_id).ok_or_else(|| {
        InsightError::ReferenceScope(format!(
            "attribute '{}' references object type '{object_type_id}' not present in schema '{}'",
            attribute.name, schema.key
        ))
    })?;
    let live_id = target.api_id.clone().ok_or_else(|| {
        InsightError::ReferenceScope(format!(
            "attribute '{}' references object type '{}' which has no live id yet",
            attribute.name, target.name
        ))
    })?;

    Ok((live_id, attribute.ref_type_id.clone()))
}
