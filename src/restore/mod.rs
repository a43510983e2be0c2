//! Restore Orchestrator.
//!
//! Drives the end-to-end reconciliation as an explicit phase machine:
//!
//! ```text
//! Loading -> SchemasEnsured -> TreesResolved -> AttributesResolved -> Done
//! ```
//!
//! Each phase must complete for *every* schema in the batch before the next
//! starts. The two-pass split between tree resolution and attribute creation
//! is what makes cross-schema forward references resolvable: a type-1
//! attribute may point at an object type in a schema loaded later in the key
//! list.
//!
//! Idempotency is existence-by-name/key against the live system; there is no
//! persisted restore-progress ledger. Re-running after a mid-run failure
//! skips whatever the earlier run managed to create.

mod attrs;
mod tree;

pub use attrs::{AttributeReferenceResolver, BUILTIN_ATTRIBUTES, build_payload};
pub use tree::ObjectTypeTreeResolver;

use crate::api::types::CreateSchemaPayload;
use crate::api::{SchemaDirectory, SchemaMutation};
use crate::core::{InsightError, Result};
use crate::model::RestoreBatch;
use crate::snapshot::SnapshotStore;
use tracing::info;

/// Transform applied to schema keys when addressing the *target* system.
/// Snapshot documents are always read from the directory named by the
/// original key; only the key used remotely changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyTransform {
    #[default]
    None,
    /// Append a suffix, e.g. restoring `GEN` as `GENX` into a sandbox
    /// alongside the original.
    Suffix(String),
}

impl KeyTransform {
    pub fn apply(&self, key: &str) -> String {
        match self {
            Self::None => key.to_string(),
            Self::Suffix(suffix) => format!("{key}{suffix}"),
        }
    }
}

/// What to do with attribute types this tool does not handle (anything other
/// than 0 and 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownAttributePolicy {
    #[default]
    SkipAndLog,
    Fail,
}

#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub key_transform: KeyTransform,
    pub unknown_attributes: UnknownAttributePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Loading,
    SchemasEnsured,
    TreesResolved,
    AttributesResolved,
    Done,
}

/// Counts of what a run did, for the closing summary and for tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub schemas_created: usize,
    pub schemas_found: usize,
    pub object_types_created: usize,
    pub object_types_found: usize,
    pub attributes_created: usize,
    pub attributes_skipped: usize,
}

pub struct RestoreRun<'a, D, M> {
    directory: &'a D,
    mutation: &'a M,
    options: RestoreOptions,
    batch: RestoreBatch,
    phase: RestorePhase,
    report: RestoreReport,
}

impl<'a, D, M> RestoreRun<'a, D, M>
where
    D: SchemaDirectory + Sync,
    M: SchemaMutation + Sync,
{
    pub fn new(directory: &'a D, mutation: &'a M, options: RestoreOptions) -> Self {
        Self {
            directory,
            mutation,
            options,
            batch: RestoreBatch::new(),
            phase: RestorePhase::Loading,
            report: RestoreReport::default(),
        }
    }

    pub fn phase(&self) -> RestorePhase {
        self.phase
    }

    pub fn batch(&self) -> &RestoreBatch {
        &self.batch
    }

    /// Run all phases: load snapshots, ensure schemas, resolve object-type
    /// trees, create attributes.
    pub async fn run(&mut self, store: &SnapshotStore, keys: &[String]) -> Result<RestoreReport> {
        self.load(store, keys)?;
        self.ensure_schemas().await?;
        self.resolve_trees().await?;
        self.resolve_attributes().await?;
        self.finish()
    }

    /// Load every requested schema snapshot into the batch, applying the
    /// target-key transform. No remote access.
    pub fn load(&mut self, store: &SnapshotStore, keys: &[String]) -> Result<()> {
        self.require(RestorePhase::Loading)?;
        if keys.is_empty() {
            return Err(InsightError::Config("no schema keys to restore".to_string()));
        }
        for key in keys {
            let mut schema = store.load_schema(key)?;
            schema.key = self.options.key_transform.apply(key);
            info!(
                key,
                target_key = %schema.key,
                object_types = schema.object_types.len(),
                "loaded schema snapshot"
            );
            self.batch.push(schema);
        }
        Ok(())
    }

    /// Phase 1: find or create every schema, bind live ids, and enable
    /// cross-schema references on each.
    pub async fn ensure_schemas(&mut self) -> Result<()> {
        self.require(RestorePhase::Loading)?;
        if self.batch.is_empty() {
            return Err(InsightError::Config(
                "restore batch is empty; load snapshots first".to_string(),
            ));
        }

        for index in 0..self.batch.len() {
            let (key, name, description) = {
                let schema = self.batch.get(index).expect("index in range");
                (schema.key.clone(), schema.name.clone(), schema.description.clone())
            };

            let api_id = match self.directory.schema_by_key(&key).await? {
                Some(existing) => {
                    info!(key, id = %existing.id, "schema exists, skipping creation");
                    self.report.schemas_found += 1;
                    existing.id
                }
                None => {
                    let payload = CreateSchemaPayload {
                        name,
                        object_schema_key: key.clone(),
                        description,
                    };
                    let created = self.mutation.create_schema(&payload).await?;
                    info!(key, id = %created, "created schema");
                    self.report.schemas_created += 1;
                    created
                }
            };

            self.mutation.allow_other_schemas(&api_id).await?;
            self.batch.get_mut(index).expect("index in range").api_id = Some(api_id);
        }

        self.phase = RestorePhase::SchemasEnsured;
        Ok(())
    }

    /// Phase 2: resolve every schema's object-type tree, parent before child.
    pub async fn resolve_trees(&mut self) -> Result<()> {
        self.require(RestorePhase::SchemasEnsured)?;

        let resolver = ObjectTypeTreeResolver::new(self.directory, self.mutation);
        for index in 0..self.batch.len() {
            let schema = self.batch.get_mut(index).expect("index in range");
            resolver.resolve_schema(schema, &mut self.report).await?;
        }

        self.phase = RestorePhase::TreesResolved;
        Ok(())
    }

    /// Phase 3: create attributes across the whole batch. Requires every
    /// schema's tree to be resolved, not just the owning schema's.
    pub async fn resolve_attributes(&mut self) -> Result<()> {
        self.require(RestorePhase::TreesResolved)?;

        let resolver = AttributeReferenceResolver::new(
            self.directory,
            self.mutation,
            self.options.unknown_attributes,
        );
        for schema_index in 0..self.batch.len() {
            let schema = self.batch.get(schema_index).expect("index in range");
            info!(key = %schema.key, id = ?schema.api_id, "restoring attributes");
            for object_type in &schema.object_types {
                resolver
                    .create_for_object_type(&self.batch, object_type, &mut self.report)
                    .await?;
            }
        }

        self.phase = RestorePhase::AttributesResolved;
        Ok(())
    }

    /// Close the run and return the report.
    pub fn finish(&mut self) -> Result<RestoreReport> {
        self.require(RestorePhase::AttributesResolved)?;
        self.phase = RestorePhase::Done;
        Ok(self.report)
    }

    fn require(&self, expected: RestorePhase) -> Result<()> {
        if self.phase != expected {
            return Err(InsightError::Config(format!(
                "restore phase {:?} attempted while in {:?}",
                expected, self.phase
            )));
        }
        Ok(())
    }
}
