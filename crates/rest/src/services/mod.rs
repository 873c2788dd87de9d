//! Domain services.
//!
//! One service per entity. Each service resolves the owning parent before
//! touching a child, treats a child whose parent id differs from the path's
//! parent id as missing, and projects results into response DTOs.
//!
//! - [`PatientService`] - patients, OIB lookup and search, details
//! - [`MedicalRecordService`] - a patient's medical records
//! - [`ExaminationService`] - a patient's examinations
//! - [`PrescriptionService`] - an examination's prescriptions
//! - [`ExaminationFileService`] - an examination's attachments and their blobs

mod examination_files;
mod examinations;
mod medical_records;
mod patients;
mod prescriptions;

pub use examination_files::{DownloadedFile, ExaminationFileService};
pub use examinations::ExaminationService;
pub use medical_records::MedicalRecordService;
pub use patients::PatientService;
pub use prescriptions::PrescriptionService;

use medsys_persistence::blob::BlobError;
use medsys_persistence::models::EntityKind;
use medsys_persistence::error::{ConstraintError, StorageError};
use thiserror::Error;

/// Outcome of a failed service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The addressed entity, or its declared parent, does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Label of the missing entity ("Patient", "Medical record").
        entity: &'static str,
    },

    /// The payload is malformed.
    #[error("{0}")]
    Validation(String),

    /// A unique key is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The entity store failed.
    #[error("persistence failure: {0}")]
    Persistence(#[source] StorageError),

    /// The blob store failed on download or delete.
    #[error("{context}")]
    Storage {
        /// Caller-facing summary.
        context: &'static str,
        /// Provider error, when one was reported.
        #[source]
        source: Option<BlobError>,
    },

    /// The blob store rejected an upload.
    #[error("upload failed: {0}")]
    UploadFailed(#[source] BlobError),
}

impl ServiceError {
    /// Not-found outcome for an entity kind.
    pub fn not_found(kind: EntityKind) -> Self {
        let entity = match kind {
            EntityKind::Patient => "Patient",
            EntityKind::MedicalRecord => "Medical record",
            EntityKind::Examination => "Examination",
            EntityKind::Prescription => "Prescription",
            EntityKind::ExaminationFile => "File",
        };
        ServiceError::NotFound { entity }
    }
}

// A row that vanished between load and save is reported like any other miss.
impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Constraint(ConstraintError::StaleEntity { kind, .. }) => {
                ServiceError::not_found(kind)
            }
            other => ServiceError::Persistence(other),
        }
    }
}

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
