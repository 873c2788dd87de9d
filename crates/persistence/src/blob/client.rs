use async_trait::async_trait;
use thiserror::Error;

/// A file to be stored in the blob store.
#[derive(Debug, Clone)]
pub struct BlobUpload {
    /// Original file name, kept verbatim in the generated path.
    pub file_name: String,
    /// MIME type sent to the provider, if known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Errors raised by blob store operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The provider answered with a non-success status.
    #[error("{operation} failed: {status} - {body}")]
    Rejected {
        /// "Upload" or "Download".
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the provider.
        body: String,
    },

    /// The request never produced a response.
    #[error("{operation} failed: {message}")]
    Transport {
        /// "Upload" or "Download".
        operation: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// No object is stored under the path.
    #[error("object not found: {path}")]
    NotFound {
        /// Requested path.
        path: String,
    },

    /// The store configuration is unusable.
    #[error("invalid blob store configuration: {message}")]
    InvalidConfig {
        /// What is wrong.
        message: String,
    },
}

/// Result type alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Storage gateway for examination attachments.
///
/// Paths are opaque handles produced by [`upload`](BlobStore::upload); callers
/// persist them and hand them back unchanged.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `file` under `folder` and returns its path.
    ///
    /// The path is `{folder}/{uuid}_{file_name}`, so repeated uploads of the
    /// same name never collide.
    async fn upload(&self, file: BlobUpload, folder: &str) -> BlobResult<String>;

    /// Returns the bytes stored under `path`.
    async fn download(&self, path: &str) -> BlobResult<Vec<u8>>;

    /// Deletes the object under `path`.
    ///
    /// Never fails: any provider or transport error is logged and reported
    /// as `false`.
    async fn delete(&self, path: &str) -> bool;
}

/// Builds `{folder}/{uuid-v4}_{file_name}`.
pub fn generate_blob_path(folder: &str, file_name: &str) -> String {
    format!("{}/{}_{}", folder, uuid::Uuid::new_v4(), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_blob_path_shape() {
        let path = generate_blob_path("examination-7", "scan.pdf");
        let (folder, name) = path.split_once('/').unwrap();
        assert_eq!(folder, "examination-7");

        let (uuid_part, file_name) = name.split_once('_').unwrap();
        assert!(uuid::Uuid::parse_str(uuid_part).is_ok());
        assert_eq!(file_name, "scan.pdf");
    }

    #[test]
    fn test_generate_blob_path_is_unique() {
        assert_ne!(
            generate_blob_path("examination-1", "a.txt"),
            generate_blob_path("examination-1", "a.txt")
        );
    }

    #[test]
    fn test_rejected_display_includes_provider_detail() {
        let err = BlobError::Rejected {
            operation: "Upload",
            status: 413,
            body: "Payload too large".to_string(),
        };
        assert_eq!(err.to_string(), "Upload failed: 413 - Payload too large");
    }
}
