//! Staged writes committed as one transaction.

use crate::models::{Entity, EntityId, EntityKind, NewRecord, Record};

/// A single write waiting in a [`UnitOfWork`].
#[derive(Debug, Clone, PartialEq)]
pub enum StagedChange {
    /// Insert a new row.
    Add(NewRecord),
    /// Overwrite the mutable columns of an existing row.
    Update(Record),
    /// Delete a row (and, through cascades, its descendants).
    Delete {
        /// Kind of the row to delete.
        kind: EntityKind,
        /// Id of the row to delete.
        id: EntityId,
    },
}

/// An ordered set of staged writes.
///
/// Nothing touches the database until the unit is passed to
/// [`EntityStore::save`](crate::core::EntityStore::save), which applies the
/// changes in staging order inside a single transaction.
///
/// ```rust,ignore
/// let mut work = UnitOfWork::new();
/// work.update(examination).delete::<Prescription>(prescription_id);
/// store.save(work).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitOfWork {
    changes: Vec<StagedChange>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an insert.
    pub fn add(&mut self, new: impl Into<NewRecord>) -> &mut Self {
        self.changes.push(StagedChange::Add(new.into()));
        self
    }

    /// Stages an update of every mutable column of `entity`.
    pub fn update<E: Entity>(&mut self, entity: E) -> &mut Self {
        self.changes.push(StagedChange::Update(entity.into()));
        self
    }

    /// Stages a delete by id.
    pub fn delete<E: Entity>(&mut self, id: EntityId) -> &mut Self {
        self.changes.push(StagedChange::Delete { kind: E::KIND, id });
        self
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of staged changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns the staged changes in order.
    pub fn changes(&self) -> &[StagedChange] {
        &self.changes
    }

    /// Consumes the unit, yielding its changes in order.
    pub fn into_changes(self) -> Vec<StagedChange> {
        self.changes
    }
}

/// Outcome of a committed [`UnitOfWork`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Ids assigned to inserted rows, in staging order.
    pub inserted: Vec<(EntityKind, EntityId)>,
    /// Number of rows updated.
    pub updated: usize,
    /// Number of rows deleted directly (cascaded rows are not counted).
    pub deleted: usize,
}

impl SaveReceipt {
    /// Returns the id of the first inserted row of `kind`.
    pub fn inserted_id(&self, kind: EntityKind) -> Option<EntityId> {
        self.inserted
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
    }
}
