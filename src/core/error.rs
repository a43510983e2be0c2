use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    /// Malformed or incomplete snapshot document: missing id/name, dangling
    /// parent reference, or an attribute owner not present in the document set.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A reference attribute points at a schema or object type outside the
    /// current restore batch.
    #[error("Reference scope error: {0}")]
    ReferenceScope(String),

    /// A creation or property call returned a non-success status. Fatal.
    #[error("Remote mutation failed with status {status}: {body}")]
    RemoteMutation { status: u16, body: String },

    /// A read call failed (network error, unexpected status, malformed body).
    #[error("Remote query failed: {0}")]
    RemoteQuery(String),

    #[error("Snapshot store error: {0}")]
    Snapshot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, InsightError>;

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteQuery(err.to_string())
    }
}

impl From<std::io::Error> for InsightError {
    fn from(err: std::io::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}
