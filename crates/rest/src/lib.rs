//! # medsys-rest - Medical records REST API
//!
//! This crate exposes the MedSys medical records service over HTTP. It
//! manages patients and, per patient, medical records and examinations; per
//! examination, prescriptions and uploaded files. File contents are kept in
//! an HTTP object store, everything else in a relational database through
//! `medsys-persistence`.
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `sqlite` - SQLite backend (default, great for development)
//! - `postgres` - PostgreSQL backend (recommended for production)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medsys_rest::{create_app_with_config, ServerConfig};
//! use medsys_persistence::backends::sqlite::SqliteBackend;
//! use medsys_persistence::blob::InMemoryBlobStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SqliteBackend::open("medsys.db")?;
//!     backend.init_schema()?;
//!
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(backend, Arc::new(InMemoryBlobStore::new()), config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | list / search patients | GET | `/api/patients[?search=]` |
//! | create patient | POST | `/api/patients` |
//! | read / update / delete patient | GET/PUT/DELETE | `/api/patients/{id}` |
//! | patient by OIB | GET | `/api/patients/oib/{oib}` |
//! | patient details | GET | `/api/patients/{id}/details` |
//! | medical records | GET/POST | `/api/patients/{id}/medicalrecords` |
//! | medical record | GET/PUT/DELETE | `/api/patients/{id}/medicalrecords/{rid}` |
//! | examinations | GET/POST | `/api/patients/{id}/examinations` |
//! | examination | GET/PUT/DELETE | `/api/patients/{id}/examinations/{eid}` |
//! | prescriptions | GET/POST | `/api/examinations/{eid}/prescriptions` |
//! | prescription | PUT/DELETE | `/api/examinations/{eid}/prescriptions/{pid}` |
//! | files | GET | `/api/examinations/{eid}/examinationfiles` |
//! | upload | POST | `/api/examinations/{eid}/examinationfiles/upload` |
//! | download | GET | `/api/examinations/{eid}/examinationfiles/{fid}/download` |
//! | delete file | DELETE | `/api/examinations/{eid}/examinationfiles/{fid}` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! Errors are returned as `{"error": "..."}`:
//!
//! | HTTP Status | Cause |
//! |-------------|-------|
//! | 400 | Invalid payload, duplicate OIB, missing upload |
//! | 404 | Entity or parent not found, or child of another parent |
//! | 500 | Database or object store failure |
//!
//! ## Configuration
//!
//! See [`ServerConfig`] for the full list of `MEDSYS_*` environment variables.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (stores, configuration)
//! - [`services`] - Domain operations over the stores
//! - [`dto`] - Request and response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Validated JSON and multipart upload extractors
//! - [`responses`] - Response and header building
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use medsys_persistence::MedicalStore;
use medsys_persistence::blob::{BlobStore, InMemoryBlobStore};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration and an in-memory
/// blob store.
///
/// For more control, use [`create_app_with_config`].
///
/// # Example
///
/// ```rust,ignore
/// use medsys_rest::create_app;
/// use medsys_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// backend.init_schema()?;
/// let app = create_app(backend);
/// ```
pub fn create_app<S>(store: S) -> Router
where
    S: MedicalStore + 'static,
{
    create_app_with_config(
        store,
        Arc::new(InMemoryBlobStore::new()),
        ServerConfig::default(),
    )
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `store` - The entity store backend
/// * `blobs` - The blob store holding examination file contents
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use medsys_rest::{create_app_with_config, ServerConfig};
/// use medsys_persistence::backends::sqlite::SqliteBackend;
/// use medsys_persistence::blob::{BlobStoreConfig, HttpBlobStore};
///
/// let backend = SqliteBackend::in_memory()?;
/// let blobs = HttpBlobStore::new(BlobStoreConfig::new("https://blobs.example.com", "key"))?;
/// let config = ServerConfig {
///     port: 3000,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, Arc::new(blobs), config);
/// ```
pub fn create_app_with_config<S>(store: S, blobs: Arc<dyn BlobStore>, config: ServerConfig) -> Router
where
    S: MedicalStore + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        store.backend_name()
    );

    // Create application state
    let state = AppState::new(Arc::new(store), blobs, config.clone());

    // Build the router with all API routes
    let router = routing::create_routes(state)
        .layer(DefaultBodyLimit::max(config.max_body_size));

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    let router = router.layer(service_builder);

    // Request IDs wrap everything so the trace span can see them
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medsys_rest={level},medsys_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
