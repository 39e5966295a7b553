//! File manager error types.

use metadata::MetadataError;
use storage::StorageError;
use thiserror::Error;

/// Errors surfaced by file manager operations. Key-generation collisions
/// are retried internally and never appear here directly; only retry
/// exhaustion does.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("no file found for the given key")]
    NotFound,

    #[error("download is not supported for the {0} backend")]
    Unsupported(&'static str),

    #[error("could not generate an unused key pair after {0} attempts")]
    KeyGeneration(usize),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Result type for file manager operations.
pub type ManagerResult<T> = std::result::Result<T, ManagerError>;
