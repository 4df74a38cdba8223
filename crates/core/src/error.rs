use thiserror::Error;
use wayfinder_api::ApiError;

#[derive(Error, Debug)]
pub enum WayfinderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid glob: {0}")]
    Glob(#[from] globset::Error),
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("'{0}' resolves outside the workspace root")]
    WorkspaceViolation(String),
    #[error("operation '{operation}' timed out after {elapsed_ms} ms")]
    Timeout {
        operation: &'static str,
        elapsed_ms: u64,
    },
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for WayfinderError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        WayfinderError::Parsing(err.to_string())
    }
}

impl From<WayfinderError> for ApiError {
    fn from(err: WayfinderError) -> Self {
        match err {
            WayfinderError::Io(e) => ApiError::Io(e.to_string()),
            e @ WayfinderError::Read { .. } => ApiError::Io(e.to_string()),
            WayfinderError::Glob(e) => ApiError::InvalidParams(e.to_string()),
            WayfinderError::Pattern(e) => ApiError::InvalidParams(e.to_string()),
            WayfinderError::InvalidParams(msg) => ApiError::InvalidParams(msg),
            WayfinderError::WorkspaceViolation(path) => ApiError::WorkspaceViolation(path),
            WayfinderError::Timeout {
                operation,
                elapsed_ms,
            } => ApiError::Timeout {
                operation: operation.to_string(),
                elapsed_ms,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WayfinderError>;
