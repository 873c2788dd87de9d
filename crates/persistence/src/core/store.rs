//! Generic entity storage trait.
//!
//! [`EntityStore`] is the object a backend implements. Its methods take an
//! [`EntityKind`] tag and move [`Record`]s; [`EntityStoreExt`] wraps them in
//! typed helpers so callers work with concrete entity structs.

use async_trait::async_trait;

use crate::core::unit_of_work::UnitOfWork;
use crate::core::SaveReceipt;
use crate::error::{BackendError, StorageResult};
use crate::models::{Entity, EntityId, EntityKind, Record};

/// Generic CRUD over the closed entity set.
///
/// # Errors
///
/// Reads only fail on infrastructure problems; a missing row is `Ok(None)`.
/// [`save`](EntityStore::save) fails if any staged change fails, in which case
/// none of the staged changes are visible afterwards.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Returns a short name for this backend ("sqlite", "postgres").
    fn backend_name(&self) -> &'static str;

    /// Loads one row by kind and id.
    async fn fetch(&self, kind: EntityKind, id: EntityId) -> StorageResult<Option<Record>>;

    /// Loads every row of `kind`, ordered by id.
    async fn fetch_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>>;

    /// Commits every staged change of `work` in one transaction.
    ///
    /// Changes apply in staging order. Updating or deleting a row that does
    /// not exist fails with
    /// [`ConstraintError::StaleEntity`](crate::error::ConstraintError::StaleEntity)
    /// and rolls back the whole unit.
    async fn save(&self, work: UnitOfWork) -> StorageResult<SaveReceipt>;

    /// Verifies the backend can serve queries.
    async fn health_check(&self) -> StorageResult<()>;
}

/// Typed convenience methods over [`EntityStore`].
#[async_trait]
pub trait EntityStoreExt: EntityStore {
    /// Loads an entity by id.
    async fn get_by_id<E: Entity>(&self, id: EntityId) -> StorageResult<Option<E>> {
        match self.fetch(E::KIND, id).await? {
            Some(record) => Ok(Some(downcast(record)?)),
            None => Ok(None),
        }
    }

    /// Loads every entity of type `E`, ordered by id.
    async fn get_all<E: Entity>(&self) -> StorageResult<Vec<E>> {
        self.fetch_all(E::KIND)
            .await?
            .into_iter()
            .map(downcast)
            .collect()
    }

    /// Inserts a single entity and returns it as stored.
    async fn insert<E: Entity>(&self, new: E::New) -> StorageResult<E> {
        let mut work = UnitOfWork::new();
        work.add(new);
        let receipt = self.save(work).await?;

        let id = receipt.inserted_id(E::KIND).ok_or_else(|| {
            BackendError::Internal {
                backend_name: self.backend_name().to_string(),
                message: format!("insert of {} returned no id", E::KIND),
                source: None,
            }
        })?;

        self.get_by_id::<E>(id).await?.ok_or_else(|| {
            BackendError::Internal {
                backend_name: self.backend_name().to_string(),
                message: format!("{}/{} vanished after insert", E::KIND, id),
                source: None,
            }
            .into()
        })
    }
}

impl<T: EntityStore + ?Sized> EntityStoreExt for T {}

fn downcast<E: Entity>(record: Record) -> StorageResult<E> {
    let kind = record.kind();
    E::from_record(record).ok_or_else(|| {
        BackendError::SerializationError {
            message: format!("expected {} row, got {}", E::KIND, kind),
        }
        .into()
    })
}
