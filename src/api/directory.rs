//! Remote Directory Client: read/query operations against the target system.

use crate::api::client::HttpApi;
use crate::api::types::{
    AttributeDescriptor, ObjectTypeDescriptor, SchemaDescriptor, SchemaListPage,
};
use crate::core::Result;
use async_trait::async_trait;

/// Read-only view of the remote system. The restore path consults this for
/// its existence checks; the backup path copies its answers to disk.
#[async_trait]
pub trait SchemaDirectory {
    /// All object schemas in the workspace.
    async fn list_schemas(&self) -> Result<Vec<SchemaDescriptor>>;

    /// The flat object-type list of one schema, by live schema id.
    async fn list_object_types(&self, schema_api_id: &str) -> Result<Vec<ObjectTypeDescriptor>>;

    /// Attributes of one object type, by live object-type id.
    async fn list_attributes(
        &self,
        object_type_api_id: &str,
    ) -> Result<Vec<AttributeDescriptor>>;

    /// Find a schema by its key. The API has no keyed lookup; this scans the
    /// schema list.
    async fn schema_by_key(&self, key: &str) -> Result<Option<SchemaDescriptor>> {
        let schemas = self.list_schemas().await?;
        Ok(schemas.into_iter().find(|s| s.object_schema_key == key))
    }
}

#[async_trait]
impl SchemaDirectory for HttpApi {
    async fn list_schemas(&self) -> Result<Vec<SchemaDescriptor>> {
        let page: SchemaListPage = self.get_json("objectschema/list").await?;
        Ok(page.values)
    }

    async fn list_object_types(&self, schema_api_id: &str) -> Result<Vec<ObjectTypeDescriptor>> {
        self.get_json(&format!("objectschema/{schema_api_id}/objecttypes/flat"))
            .await
    }

    async fn list_attributes(
        &self,
        object_type_api_id: &str,
    ) -> Result<Vec<AttributeDescriptor>> {
        self.get_json(&format!("objecttype/{object_type_api_id}/attributes"))
            .await
    }
}
