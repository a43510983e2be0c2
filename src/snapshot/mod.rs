//! Snapshot store: the on-disk layout of captured schemas.
//!
//! Each schema key owns a directory under the data root holding three JSON
//! documents, persisted in the exact shape the directory reads return:
//!
//! ```text
//! <data-dir>/<KEY>/schema.json
//! <data-dir>/<KEY>/objecttypes.json
//! <data-dir>/<KEY>/attributes.json
//! ```

use crate::api::types::{AttributeDescriptor, ObjectTypeDescriptor, SchemaDescriptor};
use crate::core::{InsightError, Result};
use crate::model::Schema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SCHEMA_FILE: &str = "schema.json";
pub const OBJECT_TYPES_FILE: &str = "objecttypes.json";
pub const ATTRIBUTES_FILE: &str = "attributes.json";

pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding one schema's documents.
    pub fn schema_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn write_schema(&self, key: &str, schema: &SchemaDescriptor) -> Result<()> {
        self.write_document(key, SCHEMA_FILE, schema)
    }

    pub fn write_object_types(
        &self,
        key: &str,
        object_types: &[ObjectTypeDescriptor],
    ) -> Result<()> {
        self.write_document(key, OBJECT_TYPES_FILE, &object_types)
    }

    pub fn write_attributes(&self, key: &str, attributes: &[AttributeDescriptor]) -> Result<()> {
        self.write_document(key, ATTRIBUTES_FILE, &attributes)
    }

    pub fn read_schema(&self, key: &str) -> Result<SchemaDescriptor> {
        self.read_document(key, SCHEMA_FILE)
    }

    pub fn read_object_types(&self, key: &str) -> Result<Vec<ObjectTypeDescriptor>> {
        self.read_document(key, OBJECT_TYPES_FILE)
    }

    pub fn read_attributes(&self, key: &str) -> Result<Vec<AttributeDescriptor>> {
        self.read_document(key, ATTRIBUTES_FILE)
    }

    /// Load one schema's documents and build its [`Schema`] model, running
    /// the document-set integrity checks.
    pub fn load_schema(&self, key: &str) -> Result<Schema> {
        let schema = self.read_schema(key)?;
        let object_types = self.read_object_types(key)?;
        let attributes = self.read_attributes(key)?;
        Schema::from_documents(&schema, &object_types, &attributes)
    }

    /// Write a document atomically: serialize into a temp file in the target
    /// directory, then persist over the final name.
    fn write_document<T: Serialize>(&self, key: &str, file: &str, content: &T) -> Result<()> {
        let dir = self.schema_dir(key);
        fs::create_dir_all(&dir)
            .map_err(|e| InsightError::Snapshot(format!("creating '{}': {e}", dir.display())))?;

        let path = dir.join(file);
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| InsightError::Snapshot(format!("creating temp file in '{}': {e}", dir.display())))?;
        let json = serde_json::to_string_pretty(content)?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| InsightError::Snapshot(format!("writing '{}': {e}", path.display())))?;
        tmp.persist(&path)
            .map_err(|e| InsightError::Snapshot(format!("persisting '{}': {e}", path.display())))?;
        Ok(())
    }

    fn read_document<T: DeserializeOwned>(&self, key: &str, file: &str) -> Result<T> {
        let path = self.schema_dir(key).join(file);
        let raw = fs::read_to_string(&path)
            .map_err(|e| InsightError::Snapshot(format!("reading '{}': {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| {
            InsightError::Snapshot(format!("parsing '{}': {e}", path.display()))
        })
    }
}
