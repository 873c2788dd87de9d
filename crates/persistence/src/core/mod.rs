//! Core storage traits and abstractions.
//!
//! - [`EntityStore`] - generic fetch and transactional save over [`EntityKind`]
//! - [`EntityStoreExt`] - typed `get_by_id` / `get_all` built on top of it
//! - [`UnitOfWork`] - staged inserts, updates and deletes committed together
//! - Query traits - entity-specific lookups that need joins or filters
//!
//! # Trait Hierarchy
//!
//! ```text
//! EntityStore
//!     ├── EntityStoreExt (blanket)
//!     ├── PatientStore
//!     ├── MedicalRecordStore
//!     ├── ExaminationStore
//!     ├── PrescriptionStore
//!     └── ExaminationFileStore
//!             └── MedicalStore (blanket over all of the above)
//! ```
//!
//! Backends implement [`EntityStore`] and the five query traits; everything
//! above the store (services, handlers) is generic over [`MedicalStore`].
//!
//! [`EntityKind`]: crate::models::EntityKind

pub mod queries;
pub mod store;
pub mod unit_of_work;

pub use queries::{
    ExaminationFileStore, ExaminationStore, MedicalRecordStore, MedicalStore, PatientStore,
    PrescriptionStore,
};
pub use store::{EntityStore, EntityStoreExt};
pub use unit_of_work::{SaveReceipt, StagedChange, UnitOfWork};
