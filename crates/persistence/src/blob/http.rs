use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, error, info, warn};

use super::client::{generate_blob_path, BlobError, BlobResult, BlobStore, BlobUpload};
use super::config::BlobStoreConfig;

/// Blob store backed by a Supabase-style storage REST API.
///
/// | Operation | Request |
/// |-----------|---------|
/// | upload | `POST {url}/storage/v1/object/{bucket}/{path}` |
/// | download | `GET {url}/storage/v1/object/public/{bucket}/{path}` |
/// | delete | `DELETE {url}/storage/v1/object/{bucket}/{path}` |
///
/// Every request carries the API key in the `apikey` header; upload and
/// delete also send it as a bearer token.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    client: Client,
    base_url: Url,
    config: BlobStoreConfig,
}

impl HttpBlobStore {
    /// Validates `config` and builds the HTTP client.
    pub fn new(config: BlobStoreConfig) -> BlobResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.url).map_err(|e| BlobError::InvalidConfig {
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(concat!("medsys/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BlobError::InvalidConfig {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }

    /// Builds the object URL, percent-encoding each path segment.
    pub(crate) fn object_url(&self, public: bool, path: &str) -> BlobResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| BlobError::InvalidConfig {
                message: format!("url '{}' cannot be a base", self.config.url),
            })?;
            segments
                .pop_if_empty()
                .extend(["storage", "v1", "object"]);
            if public {
                segments.push("public");
            }
            segments.push(&self.config.bucket);
            segments.extend(path.split('/'));
        }
        Ok(url)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(&self, file: BlobUpload, folder: &str) -> BlobResult<String> {
        let path = generate_blob_path(folder, &file.file_name);
        let url = self.object_url(false, &path)?;
        debug!(path = %path, size = file.bytes.len(), "Uploading blob");

        let mut request = self
            .client
            .post(url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key);
        if let Some(content_type) = &file.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| BlobError::Transport {
                operation: "Upload",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(path = %path, status = status.as_u16(), body = %body, "Blob upload rejected");
            return Err(BlobError::Rejected {
                operation: "Upload",
                status: status.as_u16(),
                body,
            });
        }

        info!(path = %path, "Uploaded blob");
        Ok(path)
    }

    async fn download(&self, path: &str) -> BlobResult<Vec<u8>> {
        let url = self.object_url(true, path)?;

        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.api_key)
            .send()
            .await
            .map_err(|e| BlobError::Transport {
                operation: "Download",
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlobError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(path = %path, status = status.as_u16(), "Blob download rejected");
            return Err(BlobError::Rejected {
                operation: "Download",
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| BlobError::Transport {
            operation: "Download",
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn delete(&self, path: &str) -> bool {
        let url = match self.object_url(false, path) {
            Ok(url) => url,
            Err(e) => {
                warn!(path = %path, error = %e, "Cannot build blob delete URL");
                return false;
            }
        };

        match self
            .client
            .delete(url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!(path = %path, "Deleted blob");
                true
            }
            Ok(response) => {
                warn!(path = %path, status = response.status().as_u16(), "Blob delete rejected");
                false
            }
            Err(e) => {
                error!(path = %path, error = %e, "Error deleting blob");
                false
            }
        }
    }
}
