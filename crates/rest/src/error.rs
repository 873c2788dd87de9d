//! Error types for the MedSys REST API.
//!
//! Every error is returned as a JSON body of the form `{"error": "..."}`.
//! Upload failures add a `details` field carrying the storage provider's
//! message.
//!
//! # Error Mapping
//!
//! | Service outcome | HTTP Status | Body |
//! |-----------------|-------------|------|
//! | NotFound | 404 | `"<Entity> not found"` |
//! | Validation | 400 | violation messages |
//! | Conflict | 400 | conflict message |
//! | Persistence | 500 | generic message |
//! | Storage | 500 | generic message |
//! | UploadFailed | 500 | `"Error uploading file"` + `details` |
//!
//! Persistence and storage causes are logged, never returned.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use tracing::error;

use crate::services::ServiceError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Entity or parent not found (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// Bad request - malformed payload or duplicate key (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Upload rejected by the blob store (HTTP 500).
    UploadFailed {
        /// Provider detail.
        details: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { message } => write!(f, "Not found: {}", message),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::UploadFailed { details } => write!(f, "Upload failed: {}", details),
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RestError::NotFound { message } => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": message }))
            }
            RestError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": message }))
            }
            RestError::UploadFailed { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "Error uploading file",
                    "details": details
                }),
            ),
            RestError::InternalError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for RestError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => RestError::NotFound {
                message: err.to_string(),
            },
            ServiceError::Validation(message) | ServiceError::Conflict(message) => {
                RestError::BadRequest { message }
            }
            ServiceError::Persistence(e) => {
                error!(error = %e, "Persistence failure");
                RestError::InternalError {
                    message: "Error accessing the database".to_string(),
                }
            }
            ServiceError::Storage { context, source } => {
                match source {
                    Some(e) => error!(error = %e, "{}", context),
                    None => error!("{}", context),
                }
                RestError::InternalError {
                    message: context.to_string(),
                }
            }
            ServiceError::UploadFailed(e) => {
                error!(error = %e, "File upload failed");
                RestError::UploadFailed {
                    details: e.to_string(),
                }
            }
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
