//! Storage client implementation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use vidscribe_models::VideoFormat;

/// Configuration for the storage client.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage service base URL
    pub base_url: String,
    /// Static bearer credential attached to every request
    pub api_key: String,
}

impl StorageConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self {
            base_url: std::env::var("STORAGE_URL")
                .map_err(|_| StorageError::config_error("STORAGE_URL not set"))?,
            api_key: std::env::var("STORAGE_KEY")
                .map_err(|_| StorageError::config_error("STORAGE_KEY not set"))?,
        })
    }
}

/// Capability interface over the remote object-storage service.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload bytes under `bucket/key`, returning the public URL.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Upload a local file, inferring content type from its extension.
    async fn upload_from_path(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> StorageResult<String>;

    /// Fetch previously stored bytes.
    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Deterministic public URL for `bucket/key`, with no existence check.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// HTTP storage client with static bearer authentication.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl StorageClient {
    /// Create a new storage client from configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        Ok(Self::new(StorageConfig::from_env()?))
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for StorageClient {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        debug!("Uploading {} bytes to {}/{}", bytes.len(), bucket, key);

        let response = self
            .http
            .post(self.object_url(bucket, key))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Surface the response body verbatim for diagnosis
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UploadFailed {
                status: status.as_u16(),
                body,
            });
        }

        let url = self.public_url(bucket, key);
        info!("Uploaded {}/{}", bucket, key);
        Ok(url)
    }

    async fn upload_from_path(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> StorageResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let content_type = guess_content_type(path);
        self.upload(bucket, key, bytes, content_type).await
    }

    async fn download(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        debug!("Downloading {}/{}", bucket, key);

        let response = self
            .http
            .get(self.object_url(bucket, key))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::not_found(format!("{bucket}/{key}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DownloadFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, key
        )
    }
}

/// Infer an upload content type from a file extension.
fn guess_content_type(path: &Path) -> &'static str {
    if let Some(format) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(VideoFormat::from_filename)
    {
        return format.content_type();
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}
