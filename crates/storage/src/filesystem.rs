//! Local filesystem storage strategy.

use crate::error::{StorageError, StorageResult};
use crate::{ByteStream, Storage};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use uuid::Uuid;

/// Chunk size for streaming reads (64 KiB).
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Stores objects as plain files under a configured root folder.
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a destination path under the root, rejecting anything
    /// that could escape it.
    fn full_path(&self, destination: &str) -> StorageResult<PathBuf> {
        if destination.is_empty() {
            return Err(StorageError::InvalidPath("empty path".to_string()));
        }
        for component in Path::new(destination).components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(StorageError::InvalidPath(format!(
                        "unsafe path component in: {destination}"
                    )));
                }
            }
        }
        Ok(self.root.join(destination))
    }
}

#[async_trait]
impl Storage for FilesystemStorage {
    async fn upload(&self, destination: &str, content: &[u8]) -> StorageResult<()> {
        let path = self.full_path(destination)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file in the target directory and rename into
        // place, so a reader never observes a partially written object.
        let temp = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&temp, content).await?;
        fs::rename(&temp, &path).await?;
        Ok(())
    }

    async fn download(&self, destination: &str) -> StorageResult<ByteStream> {
        let path = self.full_path(destination)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(destination.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;

        // Stream the file in chunks instead of loading it into memory.
        let stream = async_stream::try_stream! {
            let mut file = file;
            let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                yield Bytes::copy_from_slice(&buf[..n]);
            }
        };

        Ok(Box::pin(stream))
    }

    async fn delete(&self, destination: &str) -> StorageResult<()> {
        let path = self.full_path(destination)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(destination.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
