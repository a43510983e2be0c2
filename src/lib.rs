// ============================================================================
// Insight Backup Library
// ============================================================================
//
// Backup and restore of JSM Insight object schemas. The restore side is the
// interesting part: it reconciles a captured snapshot against a live
// workspace that may already hold a partial copy, creating parents before
// children and resolving cross-schema attribute references in a second pass.

pub mod api;
pub mod backup;
pub mod core;
pub mod model;
pub mod restore;
pub mod snapshot;

// Re-export main types for convenience
pub use api::{ApiConfig, HttpApi, SchemaDirectory, SchemaMutation};
pub use backup::BackupRunner;
pub use core::{InsightError, Result};
pub use model::{Attribute, ObjectType, RestoreBatch, Schema};
pub use restore::{
    KeyTransform, RestoreOptions, RestorePhase, RestoreReport, RestoreRun, UnknownAttributePolicy,
};
pub use snapshot::SnapshotStore;
