//! # medsys-persistence
//!
//! Entity store and blob storage gateway for the MedSys medical records service.
//!
//! The crate persists five related entities (patients, medical records,
//! examinations, prescriptions and examination file metadata) in a relational
//! database, and moves examination attachments in and out of a remote object
//! store.
//!
//! ## Entity store
//!
//! The entity set is closed, so the store dispatches on [`EntityKind`] instead
//! of using trait objects. Reads go through [`EntityStoreExt::get_by_id`] and
//! [`EntityStoreExt::get_all`]; writes are staged in a [`UnitOfWork`] and
//! committed atomically by [`EntityStore::save`].
//!
//! ```rust,ignore
//! use medsys_persistence::backends::sqlite::SqliteBackend;
//! use medsys_persistence::core::{EntityStore, EntityStoreExt, UnitOfWork};
//! use medsys_persistence::models::{EntityKind, NewPatient, Patient};
//!
//! let store = SqliteBackend::in_memory()?;
//! store.init_schema()?;
//!
//! let mut work = UnitOfWork::new();
//! work.add(new_patient);
//! let receipt = store.save(work).await?;
//! let id = receipt.inserted_id(EntityKind::Patient).unwrap();
//!
//! let patient: Option<Patient> = store.get_by_id(id).await?;
//! ```
//!
//! ## Backends
//!
//! - `sqlite` - SQLite via rusqlite and an r2d2 pool (default)
//! - `postgres` - PostgreSQL via tokio-postgres and deadpool
//!
//! ## Blob storage
//!
//! [`blob::BlobStore`] is the storage gateway. [`blob::HttpBlobStore`] talks to
//! a Supabase-style storage REST API; [`blob::InMemoryBlobStore`] keeps objects
//! in process for development and tests.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod blob;
pub mod core;
pub mod error;
pub mod models;

pub use error::{StorageError, StorageResult};

pub use core::{
    EntityStore, EntityStoreExt, ExaminationFileStore, ExaminationStore, MedicalRecordStore,
    MedicalStore, PatientStore, PrescriptionStore, SaveReceipt, UnitOfWork,
};
pub use models::{EntityId, EntityKind};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
