use chrono::{DateTime, Utc};
use medsys_persistence::models::{EntityId, ExaminationFile};
use serde::{Deserialize, Serialize};

/// File metadata as embedded in an examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaminationFileDto {
    /// File id.
    pub id: EntityId,
    /// Owning examination.
    pub examination_id: EntityId,
    /// Original file name.
    pub file_name: String,
    /// Blob store path.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Upload timestamp.
    pub upload_date: DateTime<Utc>,
}

impl From<ExaminationFile> for ExaminationFileDto {
    fn from(file: ExaminationFile) -> Self {
        Self {
            id: file.id,
            examination_id: file.examination_id,
            file_name: file.file_name,
            file_path: file.file_path,
            file_size: file.file_size,
            upload_date: file.upload_date,
        }
    }
}

/// File metadata returned by the examination file endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    /// File id.
    pub id: EntityId,
    /// Original file name.
    pub file_name: String,
    /// Blob store path.
    pub file_path: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Upload timestamp.
    pub upload_date: DateTime<Utc>,
    /// Absolute URL of the download endpoint.
    pub download_url: String,
}

impl FileResponseDto {
    /// Projects `file`, pointing `downloadUrl` at `base_url`.
    pub fn new(file: ExaminationFile, base_url: &str) -> Self {
        let download_url = format!(
            "{}/api/examinations/{}/examinationfiles/{}/download",
            base_url.trim_end_matches('/'),
            file.examination_id,
            file.id
        );
        Self {
            id: file.id,
            file_name: file.file_name,
            file_path: file.file_path,
            file_size: file.file_size,
            upload_date: file.upload_date,
            download_url,
        }
    }
}
