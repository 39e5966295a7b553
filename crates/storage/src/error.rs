//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cloud transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cloud storage rejected {path}: HTTP {status}")]
    Remote { path: String, status: u16 },

    #[error("invalid destination path: {0}")]
    InvalidPath(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
