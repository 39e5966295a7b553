//! Server defaults and the public response message/code table.

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_PROVIDER: &str = "local";
pub const DEFAULT_UPLOAD_FOLDER: &str = "public";
pub const DEFAULT_DATA_FILE: &str = "data/file_information.json";
pub const DEFAULT_STORAGE_ROOT: &str = ".";
pub const DEFAULT_MAX_INACTIVE_DAYS: &str = "7";
pub const CLOUD_STORAGE_URL: &str = "https://storage.googleapis.com";

/// Daily sweep cadence, mirroring the original midnight job.
pub const SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

// Response messages and codes are part of the public API contract.
pub const MSG_UPLOAD_SUCCESS: &str = "File successfully uploaded";
pub const CODE_UPLOAD_SUCCESS: &str = "1000";
pub const MSG_UPLOAD_ERROR: &str = "File uploading failed";
pub const CODE_UPLOAD_ERROR: &str = "0001";
pub const MSG_DOWNLOAD_ERROR: &str = "Could not download file";
pub const CODE_DOWNLOAD_ERROR: &str = "0005";
pub const MSG_DELETE_SUCCESS: &str = "File successfully deleted";
pub const CODE_DELETE_SUCCESS: &str = "1006";
pub const MSG_DELETE_ERROR: &str = "Could not delete file";
pub const CODE_DELETE_ERROR: &str = "0007";
pub const MSG_DOWNLOAD_UNSUPPORTED: &str = "Unfortunately download api is not available for gcp";
pub const CODE_DOWNLOAD_UNSUPPORTED: &str = "0010";
