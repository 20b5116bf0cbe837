//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("container name allocation exhausted for: {0}")]
    AllocationExhausted(String),

    #[error("invalid access token: {0}")]
    InvalidToken(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
