use serde::{Deserialize, Serialize};

use super::client::{BlobError, BlobResult};

/// Connection settings for a Supabase-style storage API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlobStoreConfig {
    /// Base URL of the storage service, e.g. `https://project.supabase.co`.
    pub url: String,

    /// API key, sent as both `apikey` and bearer token.
    pub api_key: String,

    /// Bucket holding the objects.
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

fn default_bucket() -> String {
    "medical-files".to_string()
}

impl BlobStoreConfig {
    /// Creates a config for the default bucket.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            bucket: default_bucket(),
        }
    }

    /// Overrides the bucket name.
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Checks that the settings can address the storage API.
    pub fn validate(&self) -> BlobResult<()> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| BlobError::InvalidConfig {
            message: format!("url '{}' is not valid: {}", self.url, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BlobError::InvalidConfig {
                message: format!("url scheme must be http or https, got '{}'", url.scheme()),
            });
        }

        if self.api_key.trim().is_empty() {
            return Err(BlobError::InvalidConfig {
                message: "api key must not be empty".to_string(),
            });
        }

        if self.bucket.is_empty() || self.bucket.contains('/') {
            return Err(BlobError::InvalidConfig {
                message: format!("bucket '{}' is not a valid name", self.bucket),
            });
        }

        Ok(())
    }
}
