//! Storage strategy selection.

use crate::filesystem::FilesystemStorage;
use crate::gcloud::GcloudStorage;
use crate::Storage;
use std::path::PathBuf;
use std::sync::Arc;

/// Identifier of the active storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Local,
    Gcp,
}

impl StorageProvider {
    /// Parse a configured identifier. Anything unrecognized falls back
    /// to the local backend.
    pub fn parse(value: &str) -> Self {
        match value {
            "gcp" => StorageProvider::Gcp,
            _ => StorageProvider::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProvider::Local => "local",
            StorageProvider::Gcp => "gcp",
        }
    }
}

impl std::fmt::Display for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for the Google Cloud Storage variant.
#[derive(Debug, Clone)]
pub struct GcloudConfig {
    pub base_url: String,
    pub bucket: String,
    pub token: Option<String>,
}

/// Settings needed to construct either storage variant.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub local_root: PathBuf,
    pub gcloud: GcloudConfig,
}

/// Strategy selector: builds the active storage variant for a provider
/// identifier. A fresh strategy is constructed per call, nothing is
/// cached across the process lifetime, so behavior always follows the
/// latest configuration.
pub trait SelectBackend: Send + Sync {
    fn select(&self, provider: StorageProvider) -> Arc<dyn Storage>;
}

impl SelectBackend for BackendConfig {
    fn select(&self, provider: StorageProvider) -> Arc<dyn Storage> {
        match provider {
            StorageProvider::Local => Arc::new(FilesystemStorage::new(self.local_root.clone())),
            StorageProvider::Gcp => Arc::new(GcloudStorage::new(
                self.gcloud.base_url.clone(),
                self.gcloud.bucket.clone(),
                self.gcloud.token.clone(),
            )),
        }
    }
}
