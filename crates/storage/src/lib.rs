//! Pluggable storage strategies for uploaded files.

pub mod backend;
pub mod error;
pub mod filesystem;
pub mod gcloud;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

pub use backend::{BackendConfig, GcloudConfig, SelectBackend, StorageProvider};
pub use error::{StorageError, StorageResult};
pub use filesystem::FilesystemStorage;
pub use gcloud::GcloudStorage;

/// A boxed stream of bytes for lazy, single-pass downloads.
pub type ByteStream = Pin<Box<dyn Stream<Item = StorageResult<Bytes>> + Send>>;

/// Capability set implemented identically by every storage variant.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `content` to the backend at `destination`. Missing parent
    /// locations are created; the orchestrator never re-uploads an
    /// existing path, so overwrite semantics are backend-defined.
    async fn upload(&self, destination: &str, content: &[u8]) -> StorageResult<()>;

    /// Open a lazy byte stream over the object at `destination`. The
    /// caller owns the stream and must fully drain or drop it.
    async fn download(&self, destination: &str) -> StorageResult<ByteStream>;

    /// Remove the object at `destination`. Deleting a missing path is
    /// `NotFound`, to be interpreted by the caller.
    async fn delete(&self, destination: &str) -> StorageResult<()>;

    /// Static identifier for this backend type, used for logging.
    fn backend_name(&self) -> &'static str;

    /// Whether retrieval may be offered through this backend. The
    /// orchestrator consults this before calling `download`.
    fn supports_download(&self) -> bool {
        true
    }
}
