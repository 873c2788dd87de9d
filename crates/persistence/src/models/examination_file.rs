use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Metadata for a blob attached to an examination.
///
/// The bytes live in the blob store under `file_path`; this row is the only
/// index from examination to blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExaminationFile {
    /// Surrogate key.
    pub id: EntityId,
    /// Owning examination. Immutable.
    pub examination_id: EntityId,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Opaque blob store handle.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// When the upload completed.
    pub upload_date: DateTime<Utc>,
}

/// Fields supplied when recording an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExaminationFile {
    /// Owning examination.
    pub examination_id: EntityId,
    /// Original file name.
    pub file_name: String,
    /// Blob store handle returned by the upload.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
}
