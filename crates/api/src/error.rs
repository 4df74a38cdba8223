#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("Operation '{operation}' timed out after {elapsed_ms} ms")]
    Timeout {
        operation: String,
        elapsed_ms: u64,
    },
    #[error("Path is outside the workspace: {0}")]
    WorkspaceViolation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
