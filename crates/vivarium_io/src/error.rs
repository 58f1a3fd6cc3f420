//! Error types for the persistence layer.

use thiserror::Error;

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// File system errors
    #[error("file system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON encoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
