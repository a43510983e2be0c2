//! Remote Mutation Client: create operations against the target system.
//!
//! Every call here fails the whole restore run on a non-success status; a
//! later creation may depend on the identifier a failed call should have
//! produced.

use crate::api::client::HttpApi;
use crate::api::types::{
    CreateAttributePayload, CreateObjectTypePayload, CreateSchemaPayload, CreatedEntity,
};
use crate::core::Result;
use async_trait::async_trait;
use serde_json::json;

#[async_trait]
pub trait SchemaMutation {
    /// Create an object schema; returns its live id.
    async fn create_schema(&self, payload: &CreateSchemaPayload) -> Result<String>;

    /// Allow attributes in this schema to reference object types in other
    /// schemas. Set once per schema, right after it is found or created.
    async fn allow_other_schemas(&self, schema_api_id: &str) -> Result<()>;

    /// Create an object type; returns its live id.
    async fn create_object_type(&self, payload: &CreateObjectTypePayload) -> Result<String>;

    /// Create an attribute on an object type; returns its live id.
    async fn create_attribute(
        &self,
        object_type_api_id: &str,
        payload: &CreateAttributePayload,
    ) -> Result<String>;
}

#[async_trait]
impl SchemaMutation for HttpApi {
    async fn create_schema(&self, payload: &CreateSchemaPayload) -> Result<String> {
        let created: CreatedEntity = self.post_json("objectschema/create", payload).await?;
        Ok(created.id)
    }

    async fn allow_other_schemas(&self, schema_api_id: &str) -> Result<()> {
        self.post_ok(
            &format!("global/config/objectschema/{schema_api_id}/property"),
            &json!({ "allowOtherObjectSchema": true }),
        )
        .await
    }

    async fn create_object_type(&self, payload: &CreateObjectTypePayload) -> Result<String> {
        let created: CreatedEntity = self.post_json("objecttype/create", payload).await?;
        Ok(created.id)
    }

    async fn create_attribute(
        &self,
        object_type_api_id: &str,
        payload: &CreateAttributePayload,
    ) -> Result<String> {
        let created: CreatedEntity = self
            .post_json(&format!("objecttypeattribute/{object_type_api_id}"), payload)
            .await?;
        Ok(created.id)
    }
}
