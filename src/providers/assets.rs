use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::instrument;

use super::ProviderError;

/// Asset storage capability for product, category, banner and profile
/// images.
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Upload raw file bytes into a folder; returns the public URL.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        folder: &str,
        filename: &str,
    ) -> Result<String, ProviderError>;

    /// Delete a previously uploaded asset by URL. Best effort.
    async fn delete(&self, url: &str) -> Result<(), ProviderError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// HTTP-backed media storage (cloud CDN style API).
pub struct HttpAssetStorage {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpAssetStorage {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl AssetStorage for HttpAssetStorage {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bytes: Vec<u8>,
        folder: &str,
        filename: &str,
    ) -> Result<String, ProviderError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("folder", folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Api(format!("upload failed: {status}")));
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.url)
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(format!("{}/assets", self.endpoint))
            .bearer_auth(&self.api_key)
            .query(&[("url", url)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Api(format!("delete failed: {status}")));
        }
        Ok(())
    }
}

/// In-memory storage used by tests; uploads resolve to deterministic URLs.
#[derive(Default)]
pub struct InMemoryAssetStorage {
    uploads: Mutex<Vec<String>>,
}

impl InMemoryAssetStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_urls(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStorage for InMemoryAssetStorage {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        folder: &str,
        filename: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("https://assets.test/{folder}/{filename}");
        self.uploads.lock().unwrap().push(url.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), ProviderError> {
        self.uploads.lock().unwrap().retain(|u| u != url);
        Ok(())
    }
}
