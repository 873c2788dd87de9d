//! Application state for the MedSys REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the entity store, the blob store and the server
//! configuration. Services are cheap views over this state and are built per
//! request.

use std::sync::Arc;

use medsys_persistence::MedicalStore;
use medsys_persistence::blob::BlobStore;

use crate::config::ServerConfig;
use crate::services::{
    ExaminationFileService, ExaminationService, MedicalRecordService, PatientService,
    PrescriptionService,
};

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The entity store backend (must implement [`MedicalStore`])
///
/// # Example
///
/// ```rust,ignore
/// use medsys_rest::{AppState, ServerConfig};
/// use medsys_persistence::backends::sqlite::SqliteBackend;
/// use medsys_persistence::blob::InMemoryBlobStore;
/// use std::sync::Arc;
///
/// let backend = SqliteBackend::in_memory()?;
/// let state = AppState::new(
///     Arc::new(backend),
///     Arc::new(InMemoryBlobStore::new()),
///     ServerConfig::default(),
/// );
/// ```
pub struct AppState<S> {
    /// The entity store.
    store: Arc<S>,

    /// The blob store.
    blobs: Arc<dyn BlobStore>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            blobs: Arc::clone(&self.blobs),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: MedicalStore> AppState<S> {
    /// Creates a new AppState with the given stores and configuration.
    pub fn new(store: Arc<S>, blobs: Arc<dyn BlobStore>, config: ServerConfig) -> Self {
        Self {
            store,
            blobs,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the entity store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Patient operations.
    pub fn patients(&self) -> PatientService<S> {
        PatientService::new(Arc::clone(&self.store))
    }

    /// Medical record operations.
    pub fn medical_records(&self) -> MedicalRecordService<S> {
        MedicalRecordService::new(Arc::clone(&self.store))
    }

    /// Examination operations.
    pub fn examinations(&self) -> ExaminationService<S> {
        ExaminationService::new(Arc::clone(&self.store))
    }

    /// Prescription operations.
    pub fn prescriptions(&self) -> PrescriptionService<S> {
        PrescriptionService::new(Arc::clone(&self.store))
    }

    /// Examination file operations.
    pub fn examination_files(&self) -> ExaminationFileService<S> {
        ExaminationFileService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.blobs),
            self.base_url(),
        )
    }
}
