use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.atlassian.com/jsm/insight/workspace";

/// Remote API connection configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Workspace identifier, part of every request path.
    pub workspace_id: String,

    /// Username for basic auth (Atlassian account email).
    pub username: String,

    /// API token used as the basic auth password.
    pub password: String,

    /// Base URL without the workspace segment. Overridable for testing
    /// against a local stand-in.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(workspace_id: &str, username: &str, password: &str) -> Self {
        Self {
            workspace_id: workspace_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the base URL (no trailing slash).
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Root of all endpoint paths for this workspace.
    pub fn workspace_url(&self) -> String {
        format!("{}/{}/v1", self.base_url, self.workspace_id)
    }

    /// Validate configuration before building a client.
    pub fn validate(&self) -> Result<(), String> {
        if self.workspace_id.is_empty() {
            return Err("workspace id cannot be empty".to_string());
        }
        if self.username.is_empty() {
            return Err("username cannot be empty".to_string());
        }
        if self.password.is_empty() {
            return Err("password cannot be empty".to_string());
        }
        Ok(())
    }
}
