use crate::error::{MetadataError, MetadataResult};
use crate::models::FileRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use uuid::Uuid;

/// Full durable state: backend identifier -> public key -> record.
type Snapshot = HashMap<String, HashMap<String, FileRecord>>;

/// Keyed metadata store backed by a single JSON document.
///
/// Loaded once at startup; every mutating operation rewrites the whole
/// snapshot (write-to-temp-then-rename) before returning success.
pub struct MetadataStore {
    data_file: PathBuf,
    snapshot: Snapshot,
}

impl MetadataStore {
    /// Load the snapshot from `data_file`, starting empty if the file
    /// does not exist yet.
    pub fn load(data_file: impl Into<PathBuf>) -> MetadataResult<Self> {
        let data_file = data_file.into();
        let snapshot = if data_file.exists() {
            let content = fs::read_to_string(&data_file)?;
            serde_json::from_str(&content)?
        } else {
            Snapshot::new()
        };
        Ok(Self {
            data_file,
            snapshot,
        })
    }

    /// Path of the durable JSON document.
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn find_by_public_key(&self, backend: &str, public_key: &str) -> Option<&FileRecord> {
        self.snapshot.get(backend)?.get(public_key)
    }

    /// Look up a record by private key, returning the owning public key
    /// alongside it.
    pub fn find_by_private_key(
        &self,
        backend: &str,
        private_key: &str,
    ) -> Option<(&str, &FileRecord)> {
        self.snapshot
            .get(backend)?
            .iter()
            .find(|(_, record)| record.private_key == private_key)
            .map(|(public_key, record)| (public_key.as_str(), record))
    }

    /// Look up a record by destination path. Paths are unique within a
    /// backend, which is what makes uploads idempotent.
    pub fn find_by_destination_path(
        &self,
        backend: &str,
        path: &str,
    ) -> Option<(&str, &FileRecord)> {
        self.snapshot
            .get(backend)?
            .iter()
            .find(|(_, record)| record.file_name == path)
            .map(|(public_key, record)| (public_key.as_str(), record))
    }

    /// Insert a new record and persist. Fails if the public key is
    /// already present for this backend.
    pub fn insert(
        &mut self,
        backend: &str,
        public_key: &str,
        record: FileRecord,
    ) -> MetadataResult<()> {
        let records = self.snapshot.entry(backend.to_string()).or_default();
        if records.contains_key(public_key) {
            return Err(MetadataError::DuplicateKey(public_key.to_string()));
        }
        records.insert(public_key.to_string(), record);
        self.persist()
    }

    /// Set `lastAccessedAt` to now and persist. Fails loudly when the
    /// record is absent so callers can distinguish a stale key from a
    /// successful touch.
    pub fn touch(&mut self, backend: &str, public_key: &str) -> MetadataResult<()> {
        let record = self
            .snapshot
            .get_mut(backend)
            .and_then(|records| records.get_mut(public_key))
            .ok_or_else(|| MetadataError::NotFound(public_key.to_string()))?;
        record.last_accessed_at = OffsetDateTime::now_utc();
        self.persist()
    }

    /// Remove the mapping entry entirely (not merely blanking its value)
    /// and persist. Returns the removed record.
    pub fn remove(&mut self, backend: &str, public_key: &str) -> MetadataResult<FileRecord> {
        let record = self
            .snapshot
            .get_mut(backend)
            .and_then(|records| records.remove(public_key))
            .ok_or_else(|| MetadataError::NotFound(public_key.to_string()))?;
        self.persist()?;
        Ok(record)
    }

    /// All records for a backend, cloned so the expiry sweep can iterate
    /// without holding a borrow across its own deletions.
    pub fn records(&self, backend: &str) -> Vec<(String, FileRecord)> {
        self.snapshot
            .get(backend)
            .map(|records| {
                records
                    .iter()
                    .map(|(public_key, record)| (public_key.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Serialize the entire snapshot to the data file. The write goes to
    /// a temp file in the same directory and is renamed into place, so a
    /// crash mid-write leaves the previous snapshot intact.
    fn persist(&self) -> MetadataResult<()> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.snapshot)?;
        let temp_file = self
            .data_file
            .with_extension(format!("tmp-{}", Uuid::new_v4()));
        fs::write(&temp_file, content)?;
        fs::rename(&temp_file, &self.data_file)?;
        Ok(())
    }
}
