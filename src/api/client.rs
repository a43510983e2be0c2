//! HTTP wrapper for the Insight workspace API.
//!
//! Thin layer over reqwest: basic auth on every request, JSON bodies, and
//! status mapping. Reads that fail become [`InsightError::RemoteQuery`];
//! writes that return anything but 200/201 become
//! [`InsightError::RemoteMutation`] carrying the response body for the
//! diagnostic printed at exit.

use crate::api::config::ApiConfig;
use crate::core::{InsightError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub struct HttpApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate().map_err(InsightError::Config)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InsightError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.workspace_url(), path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::RemoteQuery(format!(
                "GET {path} returned {status}: {body}"
            )));
        }
        Ok(response.json().await?)
    }

    /// POST a JSON body and decode the JSON response. Mutation endpoints
    /// answer 200 or 201; anything else fails the run.
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.post_raw(path, body).await?;
        response
            .json()
            .await
            .map_err(|e| InsightError::RemoteQuery(format!("POST {path} response: {e}")))
    }

    /// POST a JSON body, discarding the response payload.
    pub(crate) async fn post_ok<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.post_raw(path, body).await.map(|_| ())
    }

    async fn post_raw<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(self.url(path))
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 && status != 201 {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::RemoteMutation { status, body });
        }
        Ok(response)
    }
}
