//! Backup traversal: copy one schema's remote definition to snapshot files.
//!
//! Unlike restore, backup has no ordering problem; it reads the schema
//! descriptor, the flat object-type list, and every object type's attributes,
//! and persists them verbatim.

use crate::api::SchemaDirectory;
use crate::core::{InsightError, Result};
use crate::snapshot::SnapshotStore;
use tracing::info;

pub struct BackupRunner<'a, D: SchemaDirectory + Sync> {
    directory: &'a D,
    store: &'a SnapshotStore,
}

impl<'a, D: SchemaDirectory + Sync> BackupRunner<'a, D> {
    pub fn new(directory: &'a D, store: &'a SnapshotStore) -> Self {
        Self { directory, store }
    }

    /// Capture one schema by key into `<data-dir>/<KEY>/`.
    pub async fn backup_schema(&self, key: &str) -> Result<()> {
        let schema = self
            .directory
            .schema_by_key(key)
            .await?
            .ok_or_else(|| {
                InsightError::RemoteQuery(format!("schema with key '{key}' not found remotely"))
            })?;
        info!(key, id = %schema.id, "backing up schema");
        self.store.write_schema(key, &schema)?;

        let object_types = self.directory.list_object_types(&schema.id).await?;
        self.store.write_object_types(key, &object_types)?;

        let mut attributes = Vec::new();
        for object_type in &object_types {
            let mut object_type_attributes =
                self.directory.list_attributes(&object_type.id).await?;
            attributes.append(&mut object_type_attributes);
        }
        self.store.write_attributes(key, &attributes)?;

        info!(
            key,
            object_types = object_types.len(),
            attributes = attributes.len(),
            "schema backed up"
        );
        Ok(())
    }

    /// Capture a list of schemas, stopping at the first failure.
    pub async fn backup_all(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            self.backup_schema(key).await?;
        }
        Ok(())
    }
}
