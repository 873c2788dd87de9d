use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::{generate_blob_path, BlobError, BlobResult, BlobStore, BlobUpload};

/// Process-local blob store.
///
/// Used when no remote storage is configured and by the test suites. Uploads
/// and deletes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    refuse_uploads: AtomicBool,
    refuse_deletes: AtomicBool,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent uploads fail with a provider rejection.
    pub fn set_refuse_uploads(&self, refuse: bool) {
        self.refuse_uploads.store(refuse, Ordering::SeqCst);
    }

    /// Makes subsequent deletes report `false`.
    pub fn set_refuse_deletes(&self, refuse: bool) {
        self.refuse_deletes.store(refuse, Ordering::SeqCst);
    }

    /// Returns true if an object is stored under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.objects.read().contains_key(path)
    }

    /// Returns the number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, file: BlobUpload, folder: &str) -> BlobResult<String> {
        if self.refuse_uploads.load(Ordering::SeqCst) {
            return Err(BlobError::Rejected {
                operation: "Upload",
                status: 503,
                body: "storage unavailable".to_string(),
            });
        }

        let path = generate_blob_path(folder, &file.file_name);
        self.objects.write().insert(path.clone(), file.bytes);
        Ok(path)
    }

    async fn download(&self, path: &str) -> BlobResult<Vec<u8>> {
        self.objects
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| BlobError::NotFound {
                path: path.to_string(),
            })
    }

    async fn delete(&self, path: &str) -> bool {
        if self.refuse_deletes.load(Ordering::SeqCst) {
            return false;
        }
        self.objects.write().remove(path).is_some()
    }
}
