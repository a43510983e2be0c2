//! Object-Type Tree Resolver.
//!
//! Ensures every object type of one schema has a live id in the target
//! system, creating remote object types only when absent and only after their
//! parent exists. The resolver is a memoized walk over the parent DAG: the
//! remote list is fetched once per schema and kept as a name index, live ids
//! are cached per snapshot id, and each node recurses into its ancestor chain
//! on demand. Resolution order across siblings is the snapshot's document
//! order.

use crate::api::types::CreateObjectTypePayload;
use crate::api::{SchemaDirectory, SchemaMutation};
use crate::core::{InsightError, Result};
use crate::model::Schema;
use crate::restore::RestoreReport;
use async_recursion::async_recursion;
use std::collections::{HashMap, HashSet};
use tracing::info;

pub struct ObjectTypeTreeResolver<'a, D, M> {
    directory: &'a D,
    mutation: &'a M,
}

impl<'a, D, M> ObjectTypeTreeResolver<'a, D, M>
where
    D: SchemaDirectory + Sync,
    M: SchemaMutation + Sync,
{
    pub fn new(directory: &'a D, mutation: &'a M) -> Self {
        Self { directory, mutation }
    }

    /// Resolve every object type of `schema`, binding `api_id` on each.
    ///
    /// The schema itself must already carry a live id.
    pub async fn resolve_schema(
        &self,
        schema: &mut Schema,
        report: &mut RestoreReport,
    ) -> Result<()> {
        let schema_api_id = schema.api_id.clone().ok_or_else(|| {
            InsightError::Config(format!(
                "schema '{}' has no live id; schemas must be ensured before tree resolution",
                schema.key
            ))
        })?;

        let remote = self.directory.list_object_types(&schema_api_id).await?;
        let mut live_by_name: HashMap<String, String> =
            remote.into_iter().map(|t| (t.name, t.id)).collect();
        let mut live_by_id: HashMap<String, String> = HashMap::new();
        let mut visiting: HashSet<String> = HashSet::new();

        let order: Vec<String> = schema.object_types.iter().map(|t| t.id.clone()).collect();
        for id in &order {
            self.resolve(
                id,
                schema,
                &schema_api_id,
                &mut live_by_name,
                &mut live_by_id,
                &mut visiting,
                report,
            )
            .await?;
        }

        for object_type in &mut schema.object_types {
            // Every id in `order` was resolved or the loop above failed.
            object_type.api_id = live_by_id.get(&object_type.id).cloned();
        }
        Ok(())
    }

    /// Resolve one object type to its live id, creating missing ancestors
    /// first.
    #[async_recursion]
    #[allow(clippy::too_many_arguments)]
    async fn resolve(
        &self,
        id: &str,
        schema: &Schema,
        schema_api_id: &str,
        live_by_name: &mut HashMap<String, String>,
        live_by_id: &mut HashMap<String, String>,
        visiting: &mut HashSet<String>,
        report: &mut RestoreReport,
    ) -> Result<String> {
        if let Some(live_id) = live_by_id.get(id) {
            return Ok(live_id.clone());
        }
        // The model build rejects cyclic parent graphs; this guards against
        // resolver bugs rather than bad data.
        if !visiting.insert(id.to_string()) {
            return Err(InsightError::DataIntegrity(format!(
                "cycle while resolving object type '{id}' in schema '{}'",
                schema.key
            )));
        }

        let object_type = schema.object_type(id).ok_or_else(|| {
            InsightError::DataIntegrity(format!(
                "object type '{id}' not found in schema '{}'",
                schema.key
            ))
        })?;

        let live_id = if let Some(existing) = live_by_name.get(&object_type.name) {
            // Idempotency short-circuit: same name already present remotely.
            info!(
                name = %object_type.name,
                id = %existing,
                "skip creating object type, already present"
            );
            report.object_types_found += 1;
            existing.clone()
        } else {
            let parent_live_id = match &object_type.parent_id {
                Some(parent_id) => Some(
                    self.resolve(
                        parent_id,
                        schema,
                        schema_api_id,
                        live_by_name,
                        live_by_id,
                        visiting,
                        report,
                    )
                    .await?,
                ),
                None => None,
            };

            let payload = CreateObjectTypePayload {
                name: object_type.name.clone(),
                icon_id: object_type.icon_id.clone(),
                object_schema_id: schema_api_id.to_string(),
                parent_object_type_id: parent_live_id,
            };
            let created = self.mutation.create_object_type(&payload).await?;
            info!(name = %object_type.name, id = %created, "created object type");
            report.object_types_created += 1;
            live_by_name.insert(object_type.name.clone(), created.clone());
            created
        };

        visiting.remove(id);
        live_by_id.insert(id.to_string(), live_id.clone());
        Ok(live_id)
    }
}
