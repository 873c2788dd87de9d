//! Examination file handlers.
//!
//! `[base]/api/examinations/[examination_id]/examinationfiles`
//!
//! File contents live in the blob store; the database keeps the metadata and
//! the blob path.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medsys_persistence::MedicalStore;
use medsys_persistence::models::EntityId;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::FileUpload;
use crate::responses;
use crate::state::AppState;

/// Lists an examination's files with their download URLs.
///
/// # HTTP Request
///
/// `GET [base]/api/examinations/[examination_id]/examinationfiles`
pub async fn list_files_handler<S>(
    State(state): State<AppState<S>>,
    Path(examination_id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, "Processing file list request");

    let files = state.examination_files().list(examination_id).await?;
    Ok(Json(files).into_response())
}

/// Uploads a file for an examination.
///
/// # HTTP Request
///
/// `POST [base]/api/examinations/[examination_id]/examinationfiles/upload`
///
/// A `multipart/form-data` body with a `file` part and an optional
/// `description` part.
///
/// # Response
///
/// - `200 OK` - The stored file with its `downloadUrl`
/// - `400 Bad Request` - No file, or an empty one
/// - `404 Not Found` - No such examination
/// - `500 Internal Server Error` - The blob store rejected the upload;
///   `details` carries its message
///
/// # Example
///
/// ```http
/// POST /api/examinations/3/examinationfiles/upload HTTP/1.1
/// Content-Type: multipart/form-data; boundary=X
///
/// --X
/// Content-Disposition: form-data; name="file"; filename="ecg.pdf"
/// Content-Type: application/pdf
///
/// ...
/// --X--
/// ```
pub async fn upload_file_handler<S>(
    State(state): State<AppState<S>>,
    Path(examination_id): Path<EntityId>,
    upload: FileUpload,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(
        examination_id,
        file_name = %upload.file.file_name,
        size = upload.file.bytes.len(),
        description = ?upload.description,
        "Processing file upload request"
    );

    let file = state
        .examination_files()
        .upload(examination_id, upload.file)
        .await?;
    Ok(Json(file).into_response())
}

/// Downloads a file's contents.
///
/// # HTTP Request
///
/// `GET [base]/api/examinations/[examination_id]/examinationfiles/[file_id]/download`
///
/// # Response
///
/// - `200 OK` - `application/octet-stream` body with
///   `Content-Disposition: attachment`
/// - `404 Not Found` - No such examination or file
/// - `500 Internal Server Error` - The blob store could not serve the file
pub async fn download_file_handler<S>(
    State(state): State<AppState<S>>,
    Path((examination_id, file_id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, file_id, "Processing file download request");

    let file = state
        .examination_files()
        .download(examination_id, file_id)
        .await?;
    Ok(responses::attachment(&file.file_name, file.bytes))
}

/// Deletes a file from the blob store, then its record.
///
/// # HTTP Request
///
/// `DELETE [base]/api/examinations/[examination_id]/examinationfiles/[file_id]`
///
/// # Response
///
/// - `204 No Content` - File deleted
/// - `404 Not Found` - No such examination or file
/// - `500 Internal Server Error` - The blob store did not confirm the
///   deletion; the record is kept
pub async fn delete_file_handler<S>(
    State(state): State<AppState<S>>,
    Path((examination_id, file_id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, file_id, "Processing file delete request");

    state
        .examination_files()
        .delete(examination_id, file_id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
