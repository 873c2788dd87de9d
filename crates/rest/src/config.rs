//! Server configuration for the MedSys REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEDSYS_SERVER_PORT` | 8080 | Server port |
//! | `MEDSYS_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `MEDSYS_LOG_LEVEL` | info | Log level |
//! | `MEDSYS_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `MEDSYS_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `MEDSYS_ENABLE_CORS` | true | Enable CORS |
//! | `MEDSYS_CORS_ORIGINS` | * | Allowed origins |
//! | `MEDSYS_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `MEDSYS_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Request-ID | Allowed headers |
//! | `MEDSYS_BASE_URL` | http://localhost:8080 | Server base URL |
//! | `MEDSYS_DATABASE_URL` | medsys.db | SQLite path, `:memory:` or `postgres://` URL |
//! | `MEDSYS_STORAGE_BACKEND` | sqlite | Database backend (`sqlite`, `postgres`) |
//! | `MEDSYS_BLOB_URL` | - | Object storage base URL |
//! | `MEDSYS_BLOB_API_KEY` | - | Object storage API key |
//! | `MEDSYS_BLOB_BUCKET` | medical-files | Object storage bucket |
//! | `MEDSYS_ENABLE_REQUEST_ID` | true | Generate and propagate `x-request-id` |
//!
//! # Example
//!
//! ```rust
//! use medsys_rest::ServerConfig;
//!
//! // Create from environment
//! let config = ServerConfig::from_env();
//!
//! // Or create programmatically
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use medsys_persistence::blob::BlobStoreConfig;

/// Server configuration for the MedSys REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "medsys")]
#[command(about = "Medical records REST API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "MEDSYS_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "MEDSYS_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "MEDSYS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes. Bounds file uploads.
    #[arg(long, env = "MEDSYS_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "MEDSYS_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "MEDSYS_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "MEDSYS_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDSYS_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "MEDSYS_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,X-Request-ID"
    )]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers and download links).
    #[arg(long, env = "MEDSYS_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Database connection string.
    #[arg(long, env = "MEDSYS_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database backend.
    #[arg(long, env = "MEDSYS_STORAGE_BACKEND", default_value = "sqlite")]
    pub storage_backend: String,

    /// Object storage base URL. Files are kept in memory when unset.
    #[arg(long, env = "MEDSYS_BLOB_URL")]
    pub blob_url: Option<String>,

    /// Object storage API key.
    #[arg(long, env = "MEDSYS_BLOB_API_KEY")]
    pub blob_api_key: Option<String>,

    /// Object storage bucket.
    #[arg(long, env = "MEDSYS_BLOB_BUCKET", default_value = "medical-files")]
    pub blob_bucket: String,

    /// Enable request ID tracking.
    #[arg(long, env = "MEDSYS_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,X-Request-ID".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: None,
            storage_backend: "sqlite".to_string(),
            blob_url: None,
            blob_api_key: None,
            blob_bucket: "medical-files".to_string(),
            enable_request_id: true,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Parses [`storage_backend`](Self::storage_backend).
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the object storage configuration, if a URL is configured.
    pub fn blob_store_config(&self) -> Option<BlobStoreConfig> {
        let url = self.blob_url.as_deref()?;
        let api_key = self.blob_api_key.clone().unwrap_or_default();
        Some(BlobStoreConfig::new(url, api_key).with_bucket(self.blob_bucket.clone()))
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e);
        }

        if let Some(blob) = self.blob_store_config() {
            if let Err(e) = blob.validate() {
                errors.push(format!("Invalid object storage configuration: {}", e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            max_body_size: 1024 * 1024,
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: Some(":memory:".to_string()),
            storage_backend: "sqlite".to_string(),
            blob_url: None,
            blob_api_key: None,
            blob_bucket: "medical-files".to_string(),
            enable_request_id: false,
        }
    }
}

/// Database backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// SQLite file or in-memory database.
    Sqlite,
    /// PostgreSQL server.
    Postgres,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Sqlite => write!(f, "sqlite"),
            StorageBackendMode::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackendMode::Sqlite),
            "postgres" | "postgresql" => Ok(StorageBackendMode::Postgres),
            other => Err(format!(
                "Unknown storage backend '{}' (expected sqlite or postgres)",
                other
            )),
        }
    }
}
