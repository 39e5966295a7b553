use crate::constants::{
    CLOUD_STORAGE_URL, DEFAULT_DATA_FILE, DEFAULT_HOST, DEFAULT_MAX_INACTIVE_DAYS,
    DEFAULT_PORT, DEFAULT_PROVIDER, DEFAULT_STORAGE_ROOT, DEFAULT_UPLOAD_FOLDER,
};
use clap::{Arg, Command};
use std::path::PathBuf;
use storage::{BackendConfig, GcloudConfig, StorageProvider};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Backend used when `PROVIDER` is unset at request time
    pub default_provider: StorageProvider,
    /// Folder prefix for uploaded files
    pub upload_folder: String,
    /// Durable metadata snapshot location
    pub data_file: PathBuf,
    /// Root directory for the local storage backend
    pub storage_root: PathBuf,
    /// Bucket for the cloud storage backend
    pub gcs_bucket: String,
    /// Bearer token for the cloud storage backend
    pub gcs_token: Option<String>,
    /// Days without access before a file is swept
    pub max_inactive_days: i64,
    /// Generated key lengths
    pub public_key_length: usize,
    pub private_key_length: usize,
}

impl ServerConfig {
    pub fn load() -> Result<Self, std::io::Error> {
        let matches = Command::new("server")
            .arg(
                Arg::new("provider")
                    .long("provider")
                    .value_name("NAME")
                    .help("Storage backend: 'local' or 'gcp' (also PROVIDER env var)"),
            )
            .arg(
                Arg::new("folder")
                    .long("folder")
                    .value_name("NAME")
                    .help("Folder prefix for uploaded files (also FOLDER env var)"),
            )
            .arg(
                Arg::new("data-file")
                    .long("data-file")
                    .value_name("PATH")
                    .help("Metadata snapshot file (also DATA_FILE env var)"),
            )
            .arg(
                Arg::new("storage-root")
                    .long("storage-root")
                    .value_name("DIR")
                    .help("Root directory for local storage (also STORAGE_ROOT env var)"),
            )
            .arg(
                Arg::new("gcs-bucket")
                    .long("gcs-bucket")
                    .value_name("BUCKET")
                    .help("Bucket for the gcp backend (also GCS_BUCKET env var)"),
            )
            .arg(
                Arg::new("max-inactive-days")
                    .long("max-inactive-days")
                    .value_name("DAYS")
                    .help("Days without access before a file is swept (also MAX_INACTIVE_DAYS env var)"),
            )
            .arg(
                Arg::new("port")
                    .long("port")
                    .value_name("PORT")
                    .help("Server port (default: 8080, or SERVER_PORT env var)"),
            )
            .arg(
                Arg::new("host")
                    .long("host")
                    .value_name("HOST")
                    .help("Server host (default: 0.0.0.0, or SERVER_HOST env var)"),
            )
            .get_matches();

        // Priority: command-line args > environment variables > defaults
        let env = |name: &str| std::env::var(name).ok();
        let pick = |arg: &str, env_name: &str, default: &str| {
            matches
                .get_one::<String>(arg)
                .cloned()
                .or_else(|| env(env_name))
                .unwrap_or_else(|| default.to_string())
        };

        let default_provider =
            StorageProvider::parse(&pick("provider", "PROVIDER", DEFAULT_PROVIDER));
        let upload_folder = pick("folder", "FOLDER", DEFAULT_UPLOAD_FOLDER);
        let data_file = PathBuf::from(pick("data-file", "DATA_FILE", DEFAULT_DATA_FILE));
        let storage_root = PathBuf::from(pick("storage-root", "STORAGE_ROOT", DEFAULT_STORAGE_ROOT));
        let gcs_bucket = pick("gcs-bucket", "GCS_BUCKET", "");
        let gcs_token = env("GCS_TOKEN");

        let max_inactive_days = pick(
            "max-inactive-days",
            "MAX_INACTIVE_DAYS",
            DEFAULT_MAX_INACTIVE_DAYS,
        );
        let max_inactive_days = max_inactive_days.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid max inactive days: {}", max_inactive_days),
            )
        })?;

        let key_length = |env_name: &str, default: usize| -> Result<usize, std::io::Error> {
            match env(env_name) {
                Some(value) => value.parse().map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Invalid {}: {}", env_name, value),
                    )
                }),
                None => Ok(default),
            }
        };
        let public_key_length = key_length("PUBLIC_KEY_LENGTH", keygen::DEFAULT_PUBLIC_KEY_LENGTH)?;
        let private_key_length =
            key_length("PRIVATE_KEY_LENGTH", keygen::DEFAULT_PRIVATE_KEY_LENGTH)?;

        let host = pick("host", "SERVER_HOST", DEFAULT_HOST);
        let port_str = pick("port", "SERVER_PORT", DEFAULT_PORT);
        let port = port_str.parse().map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid port number: {}", port_str),
            )
        })?;

        Ok(ServerConfig {
            host,
            port,
            default_provider,
            upload_folder,
            data_file,
            storage_root,
            gcs_bucket,
            gcs_token,
            max_inactive_days,
            public_key_length,
            private_key_length,
        })
    }

    /// The active backend is re-read from the environment on every call,
    /// so a configuration change takes effect between requests without a
    /// restart.
    pub fn active_provider(&self) -> StorageProvider {
        match std::env::var("PROVIDER") {
            Ok(value) => StorageProvider::parse(&value),
            Err(_) => self.default_provider,
        }
    }

    pub fn max_inactive(&self) -> time::Duration {
        time::Duration::days(self.max_inactive_days)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            local_root: self.storage_root.clone(),
            gcloud: GcloudConfig {
                base_url: CLOUD_STORAGE_URL.to_string(),
                bucket: self.gcs_bucket.clone(),
                token: self.gcs_token.clone(),
            },
        }
    }
}
