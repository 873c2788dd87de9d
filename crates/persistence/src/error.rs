//! Error types for the persistence layer.
//!
//! Lookups that miss are not errors: they return `Ok(None)` or an empty list.
//! Everything here is an infrastructure failure (connection loss, constraint
//! violation, unreadable row) and is surfaced to callers as-is.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::models::{EntityId, EntityKind};

/// The primary error type for all entity store operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database constraint errors
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if this error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Constraint(ConstraintError::UniqueViolation { .. })
        )
    }
}

/// Errors raised by relational constraints while committing a unit of work.
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },

    /// A foreign key rejected the write.
    #[error("foreign key constraint violated: {message}")]
    ForeignKeyViolation { message: String },

    /// An update or delete targeted a row that no longer exists.
    #[error("{kind}/{id} no longer exists")]
    StaleEntity { kind: EntityKind, id: EntityId },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored row could not be mapped back into an entity.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_entity_display() {
        let err = ConstraintError::StaleEntity {
            kind: EntityKind::Prescription,
            id: 7,
        };
        assert_eq!(err.to_string(), "Prescription/7 no longer exists");
    }

    #[test]
    fn test_unique_violation_detection() {
        let err: StorageError = ConstraintError::UniqueViolation {
            message: "patients.oib".to_string(),
        }
        .into();
        assert!(err.is_unique_violation());

        let err: StorageError = BackendError::MigrationError {
            message: "boom".to_string(),
        }
        .into();
        assert!(!err.is_unique_violation());
    }
}
