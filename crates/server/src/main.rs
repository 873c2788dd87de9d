//! MedSys server
//!
//! Serves the medical records REST API over a relational store and an HTTP
//! object store.

use std::sync::Arc;

use clap::Parser;
use medsys_persistence::blob::{BlobStore, HttpBlobStore, InMemoryBlobStore};
use medsys_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::{info, warn};

#[cfg(feature = "sqlite")]
use medsys_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};

/// Creates and initializes a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_url.as_deref().unwrap_or("medsys.db");
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = SqliteBackend::with_config(db_path, SqliteBackendConfig::default())?;
    backend.init_schema()?;

    Ok(backend)
}

/// Creates the blob store for examination files.
///
/// Without `MEDSYS_BLOB_URL` files are kept in process memory and lost on
/// restart.
fn create_blob_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match config.blob_store_config() {
        Some(blob_config) => {
            info!(
                url = %blob_config.url,
                bucket = %blob_config.bucket,
                "Initializing HTTP blob store"
            );
            Ok(Arc::new(HttpBlobStore::new(blob_config)?))
        }
        None => {
            warn!("MEDSYS_BLOB_URL is not set; examination files are kept in memory only");
            Ok(Arc::new(InMemoryBlobStore::new()))
        }
    }
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        "Starting MedSys server"
    );

    let blobs = create_blob_store(&config)?;

    match backend_mode {
        StorageBackendMode::Sqlite => {
            start_sqlite(config, blobs).await?;
        }
        StorageBackendMode::Postgres => {
            start_postgres(config, blobs).await?;
        }
    }

    Ok(())
}

/// Starts the server with the SQLite backend.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig, blobs: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    let app = create_app_with_config(backend, blobs, config.clone());
    serve(app, &config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig, _blobs: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p medsys-server --features sqlite"
    )
}

/// Starts the server with the PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig, blobs: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    use medsys_persistence::backends::postgres::{PostgresBackend, PostgresConfig};

    let backend = match config.database_url.as_deref() {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        }
        _ => {
            info!("Initializing PostgreSQL backend with default settings");
            PostgresBackend::new(PostgresConfig::default()).await?
        }
    };

    backend.init_schema().await?;

    let app = create_app_with_config(backend, blobs, config.clone());
    serve(app, &config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig, _blobs: Arc<dyn BlobStore>) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p medsys-server --features postgres"
    )
}

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("At least one database backend feature must be enabled");
