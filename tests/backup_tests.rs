//! Backup traversal tests: remote state → snapshot files → model.

use insight_backup::api::types::{
    AttributeDescriptor, IconRef, ObjectTypeDescriptor, ObjectTypeOwnerRef, SchemaDescriptor,
    TypeRef,
};
use insight_backup::{BackupRunner, InsightError, SchemaDirectory, SnapshotStore};
use async_trait::async_trait;

/// A read-only remote with one schema: Rack <- Server, Server carrying one
/// attribute.
struct StaticRemote;

#[async_trait]
impl SchemaDirectory for StaticRemote {
    async fn list_schemas(&self) -> insight_backup::Result<Vec<SchemaDescriptor>> {
        Ok(vec![SchemaDescriptor {
            id: "7".into(),
            name: "Datacenter".into(),
            object_schema_key: "DC".into(),
            description: Some("racks and servers".into()),
            extra: Default::default(),
        }])
    }

    async fn list_object_types(
        &self,
        schema_api_id: &str,
    ) -> insight_backup::Result<Vec<ObjectTypeDescriptor>> {
        assert_eq!(schema_api_id, "7");
        Ok(vec![
            ObjectTypeDescriptor {
                id: "10".into(),
                name: "Rack".into(),
                icon: IconRef { id: "3".into() },
                parent_object_type_id: None,
                extra: Default::default(),
            },
            ObjectTypeDescriptor {
                id: "11".into(),
                name: "Server".into(),
                icon: IconRef { id: "4".into() },
                parent_object_type_id: Some("10".into()),
                extra: Default::default(),
            },
        ])
    }

    async fn list_attributes(
        &self,
        object_type_api_id: &str,
    ) -> insight_backup::Result<Vec<AttributeDescriptor>> {
        if object_type_api_id != "11" {
            return Ok(Vec::new());
        }
        Ok(vec![AttributeDescriptor {
            id: "100".into(),
            name: "Serial".into(),
            description: None,
            label: false,
            attribute_type: 0,
            object_type: ObjectTypeOwnerRef {
                id: "11".into(),
                name: "Server".into(),
            },
            default_type: Some(TypeRef { id: "0".into() }),
            reference_object_type: None,
            reference_type: None,
            extra: Default::default(),
        }])
    }
}

#[tokio::test]
async fn backup_writes_all_three_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let runner = BackupRunner::new(&StaticRemote, &store);

    runner.backup_schema("DC").await.unwrap();

    assert!(store.schema_dir("DC").join("schema.json").exists());
    assert!(store.schema_dir("DC").join("objecttypes.json").exists());
    assert!(store.schema_dir("DC").join("attributes.json").exists());

    // The captured documents build a valid model.
    let schema = store.load_schema("DC").unwrap();
    assert_eq!(schema.key, "DC");
    assert_eq!(schema.object_types.len(), 2);
    let server = schema.object_type("11").unwrap();
    assert_eq!(server.parent_id.as_deref(), Some("10"));
    assert_eq!(server.attributes.len(), 1);
    assert_eq!(server.attributes[0].name, "Serial");
}

#[tokio::test]
async fn backup_of_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let runner = BackupRunner::new(&StaticRemote, &store);

    let err = runner.backup_schema("NOPE").await.unwrap_err();
    assert!(matches!(err, InsightError::RemoteQuery(_)));
    assert!(!store.schema_dir("NOPE").join("schema.json").exists());
}
