//! Axum extractors for request bodies.
//!
//! - [`ValidatedJson`] - Deserialize and validate a JSON payload
//! - [`FileUpload`] - Read a multipart file upload

mod file_upload;
mod validated_json;

pub use file_upload::FileUpload;
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
