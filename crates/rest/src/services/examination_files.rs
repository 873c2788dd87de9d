use std::sync::Arc;

use medsys_persistence::blob::{BlobStore, BlobUpload};
use medsys_persistence::models::{EntityId, EntityKind, Examination, ExaminationFile, NewExaminationFile};
use medsys_persistence::{EntityStoreExt, MedicalStore, UnitOfWork};
use tracing::{error, info, warn};

use super::{ServiceError, ServiceResult};
use crate::dto::FileResponseDto;

const FILE_NAME_MAX: usize = 255;

/// Bytes of a stored file with its original name.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Name the file was uploaded under.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Examination attachment operations.
///
/// Metadata lives in the entity store; contents live in the blob store under
/// `examination-{id}/`.
pub struct ExaminationFileService<S> {
    store: Arc<S>,
    blobs: Arc<dyn BlobStore>,
    base_url: String,
}

impl<S: MedicalStore> ExaminationFileService<S> {
    /// Creates the service. `base_url` prefixes the `downloadUrl` of every
    /// returned file.
    pub fn new(store: Arc<S>, blobs: Arc<dyn BlobStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            blobs,
            base_url: base_url.into(),
        }
    }

    /// Lists an examination's files.
    pub async fn list(&self, examination_id: EntityId) -> ServiceResult<Vec<FileResponseDto>> {
        self.examination(examination_id).await?;
        let files = self.store.get_files_by_examination_id(examination_id).await?;

        info!(examination_id, count = files.len(), "Retrieved examination files");
        Ok(files
            .into_iter()
            .map(|file| FileResponseDto::new(file, &self.base_url))
            .collect())
    }

    /// Stores `file` in the blob store and records its metadata.
    ///
    /// If the metadata insert fails, the uploaded blob is deleted again on a
    /// best-effort basis.
    pub async fn upload(
        &self,
        examination_id: EntityId,
        mut file: BlobUpload,
    ) -> ServiceResult<FileResponseDto> {
        self.examination(examination_id).await?;

        if file.bytes.is_empty() {
            warn!(examination_id, "No file provided or file is empty");
            return Err(ServiceError::Validation("No file provided".to_string()));
        }

        file.file_name = base_name(&file.file_name).to_string();
        if file.file_name.is_empty() {
            return Err(ServiceError::Validation("fileName is required".to_string()));
        }
        if file.file_name.chars().count() > FILE_NAME_MAX {
            return Err(ServiceError::Validation(format!(
                "fileName must be at most {} characters",
                FILE_NAME_MAX
            )));
        }

        let file_name = file.file_name.clone();
        let file_size = file.bytes.len() as i64;
        info!(examination_id, file_name = %file_name, size = file_size, "Uploading file");

        let folder = format!("examination-{}", examination_id);
        let file_path = self
            .blobs
            .upload(file, &folder)
            .await
            .map_err(ServiceError::UploadFailed)?;

        let new = NewExaminationFile {
            examination_id,
            file_name,
            file_path: file_path.clone(),
            file_size,
        };
        let stored = match self.store.insert::<ExaminationFile>(new).await {
            Ok(stored) => stored,
            Err(e) => {
                error!(examination_id, path = %file_path, error = %e, "Saving file metadata failed");
                if !self.blobs.delete(&file_path).await {
                    warn!(path = %file_path, "Uploaded blob could not be removed");
                }
                return Err(e.into());
            }
        };

        info!(file_id = stored.id, examination_id, path = %file_path, "Uploaded file");
        Ok(FileResponseDto::new(stored, &self.base_url))
    }

    /// Fetches a file's contents from the blob store.
    pub async fn download(
        &self,
        examination_id: EntityId,
        file_id: EntityId,
    ) -> ServiceResult<DownloadedFile> {
        self.examination(examination_id).await?;
        let file = self.owned_file(examination_id, file_id).await?;

        let bytes = self
            .blobs
            .download(&file.file_path)
            .await
            .map_err(|e| ServiceError::Storage {
                context: "Error downloading file",
                source: Some(e),
            })?;

        info!(file_id, examination_id, "Downloaded file");
        Ok(DownloadedFile {
            file_name: file.file_name,
            bytes,
        })
    }

    /// Deletes a file's blob, then its metadata.
    ///
    /// The metadata row is kept when the blob store does not confirm the
    /// deletion.
    pub async fn delete(&self, examination_id: EntityId, file_id: EntityId) -> ServiceResult<()> {
        self.examination(examination_id).await?;
        let file = self.owned_file(examination_id, file_id).await?;

        if !self.blobs.delete(&file.file_path).await {
            return Err(ServiceError::Storage {
                context: "Error deleting file from storage",
                source: None,
            });
        }

        let mut work = UnitOfWork::new();
        work.delete::<ExaminationFile>(file_id);
        self.store.save(work).await?;

        info!(file_id, examination_id, "Deleted file");
        Ok(())
    }

    async fn examination(&self, examination_id: EntityId) -> ServiceResult<Examination> {
        self.store
            .get_by_id::<Examination>(examination_id)
            .await?
            .ok_or_else(|| {
                warn!(examination_id, "Examination not found");
                ServiceError::not_found(EntityKind::Examination)
            })
    }

    async fn owned_file(
        &self,
        examination_id: EntityId,
        file_id: EntityId,
    ) -> ServiceResult<ExaminationFile> {
        match self.store.get_by_id::<ExaminationFile>(file_id).await? {
            Some(file) if file.examination_id == examination_id => Ok(file),
            _ => {
                warn!(file_id, examination_id, "File not found for examination");
                Err(ServiceError::not_found(EntityKind::ExaminationFile))
            }
        }
    }
}

/// Strips any directory part a client sent along with the file name.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim()
}
