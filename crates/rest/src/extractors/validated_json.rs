//! Validated JSON body extractor.
//!
//! Deserializes a request body and runs its [`Validate`] checks.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::dto::Validate;
use crate::error::RestError;

/// Axum extractor for validated JSON payloads.
///
/// # Example
///
/// ```rust,ignore
/// use medsys_rest::dto::CreatePatientRequest;
/// use medsys_rest::extractors::ValidatedJson;
///
/// async fn create_handler(ValidatedJson(request): ValidatedJson<CreatePatientRequest>) {
///     println!("Creating patient {}", request.oib);
/// }
/// ```
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

/// Error type for payload extraction failures.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// The body could not be read.
    UnreadableBody(String),
    /// The content type is not JSON.
    UnsupportedMediaType(String),
    /// JSON parsing or field conversion failed.
    InvalidJson(String),
    /// The payload parsed but violates field constraints.
    Invalid(Vec<String>),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let message = match self {
            ValidatedJsonRejection::UnreadableBody(msg) => {
                format!("Could not read request body: {}", msg)
            }
            ValidatedJsonRejection::UnsupportedMediaType(ct) => {
                format!("Content type '{}' is not supported, expected application/json", ct)
            }
            ValidatedJsonRejection::InvalidJson(msg) => format!("Invalid JSON: {}", msg),
            ValidatedJsonRejection::Invalid(errors) => errors.join("; "),
        };
        RestError::BadRequest { message }.into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // A missing content type is treated as JSON
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(ct) = content_type {
            if !ct.contains("json") {
                return Err(ValidatedJsonRejection::UnsupportedMediaType(ct));
            }
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ValidatedJsonRejection::UnreadableBody(e.to_string()))?;

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| ValidatedJsonRejection::InvalidJson(e.to_string()))?;

        value.validate().map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}
