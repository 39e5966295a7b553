//! File manager orchestration.
//!
//! Composes the key generator, metadata store and storage strategies into
//! upload (with dedup), retrieval, deletion and the inactive-file expiry
//! sweep. All metadata mutations run under one mutex held across the full
//! read-modify-persist sequence, so the persisted snapshot is always
//! consistent; the active backend identifier is passed explicitly into
//! every operation.

pub mod error;

pub use error::{ManagerError, ManagerResult};

use common::KeyPair;
use keygen::KeyGenerator;
use metadata::{FileRecord, MetadataStore};
use std::sync::Arc;
use storage::{ByteStream, SelectBackend, StorageProvider};
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Collision retries before upload gives up on key generation.
const MAX_KEY_ATTEMPTS: usize = 5;

/// Outcome of one expiry sweep pass, consumed by logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub removed: usize,
    pub failed: usize,
}

/// Orchestrates keyed file storage over a pluggable backend.
pub struct FileManager {
    store: Arc<Mutex<MetadataStore>>,
    selector: Box<dyn SelectBackend>,
    keygen: KeyGenerator,
    upload_folder: String,
}

impl FileManager {
    pub fn new(
        store: MetadataStore,
        selector: impl SelectBackend + 'static,
        keygen: KeyGenerator,
        upload_folder: impl Into<String>,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            selector: Box::new(selector),
            keygen,
            upload_folder: upload_folder.into(),
        }
    }

    /// Deterministic destination for an uploaded file name.
    fn destination_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.upload_folder, file_name)
    }

    /// Store a file and hand back its key pair.
    ///
    /// Upload is idempotent per destination path: when a record already
    /// exists for the computed path, its existing pair is returned and
    /// neither storage nor metadata is touched.
    pub async fn upload(
        &self,
        provider: StorageProvider,
        file_name: &str,
        content: &[u8],
    ) -> ManagerResult<KeyPair> {
        let backend = provider.as_str();
        let destination = self.destination_path(file_name);

        let mut store = self.store.lock().await;
        if let Some((public_key, record)) = store.find_by_destination_path(backend, &destination) {
            return Ok(KeyPair {
                public_key: public_key.to_string(),
                private_key: record.private_key.clone(),
            });
        }

        // Bytes go out first; a storage failure leaves the metadata
        // untouched.
        let strategy = self.selector.select(provider);
        strategy.upload(&destination, content).await?;

        let pair = self.unused_key_pair(&store, backend)?;
        store.insert(
            backend,
            &pair.public_key,
            FileRecord::new(&pair.private_key, &destination),
        )?;

        info!(destination = %destination, backend, "stored new file");
        Ok(pair)
    }

    /// Open a download stream for the file behind `public_key`, updating
    /// its access time first.
    pub async fn get_by_public_key(
        &self,
        provider: StorageProvider,
        public_key: &str,
    ) -> ManagerResult<ByteStream> {
        let strategy = self.selector.select(provider);
        if !strategy.supports_download() {
            return Err(ManagerError::Unsupported(strategy.backend_name()));
        }

        let backend = provider.as_str();
        let destination = {
            let mut store = self.store.lock().await;
            let record = store
                .find_by_public_key(backend, public_key)
                .ok_or(ManagerError::NotFound)?;
            let destination = record.file_name.clone();

            // Touch before streaming begins, so the access time reflects
            // the retrieval attempt even if the stream errors mid-flight.
            store.touch(backend, public_key)?;
            destination
        };

        Ok(strategy.download(&destination).await?)
    }

    /// Delete the file behind `private_key`.
    ///
    /// The metadata record is removed whether or not the backend delete
    /// succeeds; a stale entry would otherwise be undeletable forever.
    /// A backend failure is still reported after the cleanup.
    pub async fn delete_by_private_key(
        &self,
        provider: StorageProvider,
        private_key: &str,
    ) -> ManagerResult<()> {
        let backend = provider.as_str();
        let strategy = self.selector.select(provider);

        let mut store = self.store.lock().await;
        let (public_key, destination) = store
            .find_by_private_key(backend, private_key)
            .map(|(public_key, record)| (public_key.to_string(), record.file_name.clone()))
            .ok_or(ManagerError::NotFound)?;

        let deleted = strategy.delete(&destination).await;
        store.remove(backend, &public_key)?;

        match deleted {
            Ok(()) => {
                info!(destination = %destination, backend, "deleted file");
                Ok(())
            }
            Err(e) => Err(ManagerError::Storage(e)),
        }
    }

    /// One expiry pass: delete every record not accessed for longer than
    /// `max_inactive`. Per-record failures are logged and skipped; the
    /// pass never retries them.
    pub async fn sweep_inactive(
        &self,
        provider: StorageProvider,
        max_inactive: Duration,
    ) -> SweepOutcome {
        let backend = provider.as_str();
        let now = OffsetDateTime::now_utc();

        let expired: Vec<(String, FileRecord)> = {
            let store = self.store.lock().await;
            store
                .records(backend)
                .into_iter()
                .filter(|(_, record)| now - record.last_accessed_at > max_inactive)
                .collect()
        };

        let mut outcome = SweepOutcome::default();
        for (public_key, record) in expired {
            match self
                .delete_by_private_key(provider, &record.private_key)
                .await
            {
                Ok(()) => {
                    outcome.removed += 1;
                    info!(public_key = %public_key, backend, "removed inactive file");
                }
                Err(e) => {
                    outcome.failed += 1;
                    warn!(public_key = %public_key, backend, error = %e, "failed to remove inactive file");
                }
            }
        }
        outcome
    }

    /// Generate a key pair that collides with nothing already issued for
    /// this backend, retrying a bounded number of times.
    fn unused_key_pair(&self, store: &MetadataStore, backend: &str) -> ManagerResult<KeyPair> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let pair = self.keygen.generate_pair();
            let collides = store.find_by_public_key(backend, &pair.public_key).is_some()
                || store
                    .find_by_private_key(backend, &pair.private_key)
                    .is_some();
            if !collides {
                return Ok(pair);
            }
        }
        Err(ManagerError::KeyGeneration(MAX_KEY_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::{FilesystemStorage, Storage, StorageError, StorageResult};
    use tempfile::TempDir;

    const PROVIDER: StorageProvider = StorageProvider::Local;

    /// Selector that hands every provider the same strategy.
    struct FixedSelector(Arc<dyn Storage>);

    impl SelectBackend for FixedSelector {
        fn select(&self, _provider: StorageProvider) -> Arc<dyn Storage> {
            self.0.clone()
        }
    }

    /// Filesystem storage that counts uploads.
    struct RecordingStorage {
        inner: FilesystemStorage,
        uploads: AtomicUsize,
    }

    impl RecordingStorage {
        fn new(root: &TempDir) -> Arc<Self> {
            Arc::new(Self {
                inner: FilesystemStorage::new(root.path()),
                uploads: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Storage for RecordingStorage {
        async fn upload(&self, destination: &str, content: &[u8]) -> StorageResult<()> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.inner.upload(destination, content).await
        }

        async fn download(&self, destination: &str) -> StorageResult<ByteStream> {
            self.inner.download(destination).await
        }

        async fn delete(&self, destination: &str) -> StorageResult<()> {
            self.inner.delete(destination).await
        }

        fn backend_name(&self) -> &'static str {
            self.inner.backend_name()
        }
    }

    /// Storage whose delete always fails with an I/O error.
    struct FailingDelete {
        inner: FilesystemStorage,
    }

    #[async_trait]
    impl Storage for FailingDelete {
        async fn upload(&self, destination: &str, content: &[u8]) -> StorageResult<()> {
            self.inner.upload(destination, content).await
        }

        async fn download(&self, destination: &str) -> StorageResult<ByteStream> {
            self.inner.download(destination).await
        }

        async fn delete(&self, _destination: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        fn backend_name(&self) -> &'static str {
            "local"
        }
    }

    /// Storage that refuses streaming downloads, like the cloud variant.
    struct NoDownload;

    #[async_trait]
    impl Storage for NoDownload {
        async fn upload(&self, _destination: &str, _content: &[u8]) -> StorageResult<()> {
            Ok(())
        }

        async fn download(&self, destination: &str) -> StorageResult<ByteStream> {
            Err(StorageError::NotFound(destination.to_string()))
        }

        async fn delete(&self, _destination: &str) -> StorageResult<()> {
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "gcp"
        }

        fn supports_download(&self) -> bool {
            false
        }
    }

    fn empty_store(dir: &TempDir) -> MetadataStore {
        MetadataStore::load(dir.path().join("data/file_information.json")).unwrap()
    }

    fn manager_with(storage: Arc<dyn Storage>, store: MetadataStore) -> FileManager {
        FileManager::new(
            store,
            FixedSelector(storage),
            KeyGenerator::default(),
            "public",
        )
    }

    async fn drain(mut stream: ByteStream) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_upload_is_idempotent_per_destination() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage.clone(), empty_store(&dir));

        let first = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();
        let second = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_names_get_different_pairs() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage.clone(), empty_store(&dir));

        let a = manager.upload(PROVIDER, "a.txt", b"a").await.unwrap();
        let b = manager.upload(PROVIDER, "b.txt", b"b").await.unwrap();

        assert_ne!(a.public_key, b.public_key);
        assert_ne!(a.private_key, b.private_key);
        assert_eq!(storage.uploads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_touches_access_time() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage, empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();
        let stream = manager
            .get_by_public_key(PROVIDER, &pair.public_key)
            .await
            .unwrap();
        assert_eq!(drain(stream).await, b"hello");

        let store = manager.store.lock().await;
        let record = store
            .find_by_public_key(PROVIDER.as_str(), &pair.public_key)
            .unwrap();
        assert!(record.last_accessed_at >= record.uploaded_at);
    }

    #[tokio::test]
    async fn test_get_unknown_key_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage, empty_store(&dir));

        let result = manager.get_by_public_key(PROVIDER, "nope").await;
        assert!(matches!(result, Err(ManagerError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage, empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();
        manager
            .delete_by_private_key(PROVIDER, &pair.private_key)
            .await
            .unwrap();

        let result = manager.get_by_public_key(PROVIDER, &pair.public_key).await;
        assert!(matches!(result, Err(ManagerError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_unknown_key_mutates_nothing() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage, empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();
        let result = manager.delete_by_private_key(PROVIDER, "unknown").await;
        assert!(matches!(result, Err(ManagerError::NotFound)));

        // The existing record is untouched.
        let stream = manager
            .get_by_public_key(PROVIDER, &pair.public_key)
            .await
            .unwrap();
        assert_eq!(drain(stream).await, b"hello");
    }

    #[tokio::test]
    async fn test_delete_failure_still_cleans_metadata() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FailingDelete {
            inner: FilesystemStorage::new(dir.path()),
        });
        let manager = manager_with(storage, empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"hello").await.unwrap();
        let result = manager
            .delete_by_private_key(PROVIDER, &pair.private_key)
            .await;
        assert!(matches!(result, Err(ManagerError::Storage(_))));

        // The record is gone despite the backend failure.
        let again = manager
            .delete_by_private_key(PROVIDER, &pair.private_key)
            .await;
        assert!(matches!(again, Err(ManagerError::NotFound)));
    }

    #[tokio::test]
    async fn test_download_unsupported_backend() {
        let dir = TempDir::new().unwrap();
        let manager = manager_with(Arc::new(NoDownload), empty_store(&dir));

        let result = manager.get_by_public_key(StorageProvider::Gcp, "any").await;
        assert!(matches!(result, Err(ManagerError::Unsupported("gcp"))));
    }

    #[tokio::test]
    async fn test_sweep_removes_only_inactive_files() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage, empty_store(&dir));

        let stale = manager.upload(PROVIDER, "stale.txt", b"old").await.unwrap();
        let fresh = manager.upload(PROVIDER, "fresh.txt", b"new").await.unwrap();

        // Backdate the stale record past the inactivity window.
        {
            let mut store = manager.store.lock().await;
            let (public_key, mut record) = store
                .find_by_private_key(PROVIDER.as_str(), &stale.private_key)
                .map(|(public_key, record)| (public_key.to_string(), record.clone()))
                .unwrap();
            record.last_accessed_at = OffsetDateTime::now_utc() - Duration::days(30);
            store.remove(PROVIDER.as_str(), &public_key).unwrap();
            store.insert(PROVIDER.as_str(), &public_key, record).unwrap();
        }

        let outcome = manager.sweep_inactive(PROVIDER, Duration::days(7)).await;
        assert_eq!(outcome, SweepOutcome { removed: 1, failed: 0 });

        let gone = manager.get_by_public_key(PROVIDER, &stale.public_key).await;
        assert!(matches!(gone, Err(ManagerError::NotFound)));

        let kept = manager
            .get_by_public_key(PROVIDER, &fresh.public_key)
            .await
            .unwrap();
        assert_eq!(drain(kept).await, b"new");
    }

    #[tokio::test]
    async fn test_sweep_continues_past_failing_records() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(FailingDelete {
            inner: FilesystemStorage::new(dir.path()),
        });
        let manager = manager_with(storage, empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"old").await.unwrap();
        {
            let mut store = manager.store.lock().await;
            let (public_key, mut record) = store
                .find_by_private_key(PROVIDER.as_str(), &pair.private_key)
                .map(|(public_key, record)| (public_key.to_string(), record.clone()))
                .unwrap();
            record.last_accessed_at = OffsetDateTime::now_utc() - Duration::days(30);
            store.remove(PROVIDER.as_str(), &public_key).unwrap();
            store.insert(PROVIDER.as_str(), &public_key, record).unwrap();
        }

        let outcome = manager.sweep_inactive(PROVIDER, Duration::days(7)).await;
        assert_eq!(outcome, SweepOutcome { removed: 0, failed: 1 });
    }

    #[tokio::test]
    async fn test_full_scenario() {
        let dir = TempDir::new().unwrap();
        let storage = RecordingStorage::new(&dir);
        let manager = manager_with(storage.clone(), empty_store(&dir));

        let pair = manager.upload(PROVIDER, "a.txt", b"payload").await.unwrap();
        let again = manager.upload(PROVIDER, "a.txt", b"payload").await.unwrap();
        assert_eq!(pair, again);
        assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);

        let stream = manager
            .get_by_public_key(PROVIDER, &pair.public_key)
            .await
            .unwrap();
        assert_eq!(drain(stream).await, b"payload");

        manager
            .delete_by_private_key(PROVIDER, &pair.private_key)
            .await
            .unwrap();

        let result = manager.get_by_public_key(PROVIDER, &pair.public_key).await;
        assert!(matches!(result, Err(ManagerError::NotFound)));
    }
}
