//! Multipart file upload extractor.

use axum::extract::{FromRequest, Multipart, Request};
use medsys_persistence::blob::BlobUpload;

use crate::error::RestError;

/// A file posted as `multipart/form-data`.
///
/// Reads the `file` part (name matched case-insensitively) and an optional
/// `description` text part. A request without a file part yields an empty
/// upload; rejecting it is left to the service so that a missing examination
/// is reported first.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// The uploaded file.
    pub file: BlobUpload,
    /// Free-text description sent alongside the file.
    pub description: Option<String>,
}

impl<S> FromRequest<S> for FileUpload
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Invalid multipart request: {}", e),
            })?;

        let mut upload = FileUpload {
            file: BlobUpload {
                file_name: String::new(),
                content_type: None,
                bytes: Vec::new(),
            },
            description: None,
        };

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_ascii_lowercase();
            match name.as_str() {
                "file" => {
                    upload.file.file_name = field.file_name().unwrap_or_default().to_string();
                    upload.file.content_type = field.content_type().map(str::to_string);
                    upload.file.bytes = field.bytes().await.map_err(malformed)?.to_vec();
                }
                "description" => {
                    upload.description = Some(field.text().await.map_err(malformed)?);
                }
                _ => {}
            }
        }

        Ok(upload)
    }
}

fn malformed(err: axum::extract::multipart::MultipartError) -> RestError {
    RestError::BadRequest {
        message: format!("Invalid multipart request: {}", err.body_text()),
    }
}
