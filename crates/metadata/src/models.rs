use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One record per successfully uploaded file, keyed by public key in the
/// snapshot. Field names match the persisted JSON document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Deletion key, unique within the backend's namespace.
    pub private_key: String,

    /// Backend-relative destination path of the stored bytes, unique
    /// within the backend. Uniqueness is what makes uploads idempotent.
    pub file_name: String,

    /// Set once at creation, never updated.
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,

    /// Updated on every successful retrieval; read by the expiry sweep.
    #[serde(with = "time::serde::rfc3339")]
    pub last_accessed_at: OffsetDateTime,
}

impl FileRecord {
    /// Build a record for a freshly uploaded file, with both timestamps
    /// set to now.
    pub fn new(private_key: impl Into<String>, file_name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            private_key: private_key.into(),
            file_name: file_name.into(),
            uploaded_at: now,
            last_accessed_at: now,
        }
    }
}
