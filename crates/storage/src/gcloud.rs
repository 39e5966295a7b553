//! Google Cloud Storage strategy over the JSON/media API.

use crate::error::{StorageError, StorageResult};
use crate::{ByteStream, Storage};
use async_trait::async_trait;
use futures::TryStreamExt;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

/// Stores objects in a Google Cloud Storage bucket.
///
/// Network, auth and HTTP-status failures all surface as `StorageError`;
/// nothing here can take the process down.
pub struct GcloudStorage {
    client: Client,
    base_url: String,
    bucket: String,
    token: Option<String>,
}

impl GcloudStorage {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            bucket: bucket.into(),
            token,
        }
    }

    fn object_url(&self, destination: &str) -> String {
        // Object names are a single path segment; slashes in the
        // destination must be percent-encoded.
        let object = utf8_percent_encode(destination, NON_ALPHANUMERIC);
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url, self.bucket, object
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Storage for GcloudStorage {
    async fn upload(&self, destination: &str, content: &[u8]) -> StorageResult<()> {
        let response = self
            .authorize(self.client.post(self.upload_url()))
            .query(&[("uploadType", "media"), ("name", destination)])
            .body(content.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Remote {
                path: destination.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(destination, bucket = %self.bucket, "uploaded object");
        Ok(())
    }

    async fn download(&self, destination: &str) -> StorageResult<ByteStream> {
        let response = self
            .authorize(self.client.get(self.object_url(destination)))
            .query(&[("alt", "media")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(destination.to_string()));
        }
        if !status.is_success() {
            return Err(StorageError::Remote {
                path: destination.to_string(),
                status: status.as_u16(),
            });
        }

        let stream = response.bytes_stream().map_err(StorageError::from);
        Ok(Box::pin(stream))
    }

    async fn delete(&self, destination: &str) -> StorageResult<()> {
        let response = self
            .authorize(self.client.delete(self.object_url(destination)))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(destination.to_string()));
        }
        if !status.is_success() {
            return Err(StorageError::Remote {
                path: destination.to_string(),
                status: status.as_u16(),
            });
        }

        debug!(destination, bucket = %self.bucket, "deleted object");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "gcp"
    }

    /// Cloud transport cannot stream bytes synchronously behind the
    /// service boundary; retrieval is gated at the orchestration layer.
    fn supports_download(&self) -> bool {
        false
    }
}
