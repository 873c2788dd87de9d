//! Entity types persisted by the store.
//!
//! The five entities form a two-level ownership tree:
//!
//! ```text
//! Patient
//! ├── MedicalRecord
//! └── Examination
//!     ├── Prescription
//!     └── ExaminationFile
//! ```
//!
//! Every parent→child edge is one-to-many with cascade delete. Each entity has
//! a `New*` counterpart carrying the fields supplied at creation time; the
//! store assigns `id` and the creation timestamp.

mod aggregates;
mod examination;
mod examination_file;
mod medical_record;
mod patient;
mod prescription;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use aggregates::{ExaminationDetails, PatientDetails};
pub use examination::{Examination, ExaminationType, NewExamination, UnknownExaminationType};
pub use examination_file::{ExaminationFile, NewExaminationFile};
pub use medical_record::{MedicalRecord, NewMedicalRecord};
pub use patient::{Gender, NewPatient, Patient, UnknownGender};
pub use prescription::{NewPrescription, Prescription};

/// Database-assigned surrogate key.
pub type EntityId = i64;

/// The closed set of persisted entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// [`Patient`]
    Patient,
    /// [`MedicalRecord`]
    MedicalRecord,
    /// [`Examination`]
    Examination,
    /// [`Prescription`]
    Prescription,
    /// [`ExaminationFile`]
    ExaminationFile,
}

impl EntityKind {
    /// All entity kinds, parents before children.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Patient,
        EntityKind::MedicalRecord,
        EntityKind::Examination,
        EntityKind::Prescription,
        EntityKind::ExaminationFile,
    ];

    /// Returns the backing table name.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Patient => "patients",
            EntityKind::MedicalRecord => "medical_records",
            EntityKind::Examination => "examinations",
            EntityKind::Prescription => "prescriptions",
            EntityKind::ExaminationFile => "examination_files",
        }
    }

    /// Returns a human-readable name ("medical record").
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::Patient => "patient",
            EntityKind::MedicalRecord => "medical record",
            EntityKind::Examination => "examination",
            EntityKind::Prescription => "prescription",
            EntityKind::ExaminationFile => "file",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Patient => "Patient",
            EntityKind::MedicalRecord => "MedicalRecord",
            EntityKind::Examination => "Examination",
            EntityKind::Prescription => "Prescription",
            EntityKind::ExaminationFile => "ExaminationFile",
        };
        f.write_str(name)
    }
}

/// A loaded row of any entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A patient row.
    Patient(Patient),
    /// A medical record row.
    MedicalRecord(MedicalRecord),
    /// An examination row.
    Examination(Examination),
    /// A prescription row.
    Prescription(Prescription),
    /// An examination file row.
    ExaminationFile(ExaminationFile),
}

impl Record {
    /// Returns the kind of the wrapped entity.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Patient(_) => EntityKind::Patient,
            Record::MedicalRecord(_) => EntityKind::MedicalRecord,
            Record::Examination(_) => EntityKind::Examination,
            Record::Prescription(_) => EntityKind::Prescription,
            Record::ExaminationFile(_) => EntityKind::ExaminationFile,
        }
    }

    /// Returns the id of the wrapped entity.
    pub fn id(&self) -> EntityId {
        match self {
            Record::Patient(e) => e.id,
            Record::MedicalRecord(e) => e.id,
            Record::Examination(e) => e.id,
            Record::Prescription(e) => e.id,
            Record::ExaminationFile(e) => e.id,
        }
    }
}

/// Creation payload of any entity type.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    /// A patient to insert.
    Patient(NewPatient),
    /// A medical record to insert.
    MedicalRecord(NewMedicalRecord),
    /// An examination to insert.
    Examination(NewExamination),
    /// A prescription to insert.
    Prescription(NewPrescription),
    /// An examination file to insert.
    ExaminationFile(NewExaminationFile),
}

impl NewRecord {
    /// Returns the kind of entity this payload creates.
    pub fn kind(&self) -> EntityKind {
        match self {
            NewRecord::Patient(_) => EntityKind::Patient,
            NewRecord::MedicalRecord(_) => EntityKind::MedicalRecord,
            NewRecord::Examination(_) => EntityKind::Examination,
            NewRecord::Prescription(_) => EntityKind::Prescription,
            NewRecord::ExaminationFile(_) => EntityKind::ExaminationFile,
        }
    }
}

/// Compile-time link between an entity struct and its [`EntityKind`].
///
/// Implemented for the five entity structs only; the generic store
/// operations in [`crate::core::EntityStoreExt`] are written against it.
pub trait Entity: Clone + Send + Sync + Into<Record> + 'static {
    /// The kind tag for this entity type.
    const KIND: EntityKind;

    /// The creation payload for this entity type.
    type New: Into<NewRecord> + Send;

    /// Returns the entity id.
    fn id(&self) -> EntityId;

    /// Unwraps a [`Record`] of the matching kind.
    fn from_record(record: Record) -> Option<Self>;
}

macro_rules! impl_entity {
    ($entity:ident, $new:ident) => {
        impl Entity for $entity {
            const KIND: EntityKind = EntityKind::$entity;
            type New = $new;

            fn id(&self) -> EntityId {
                self.id
            }

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$entity(entity) => Some(entity),
                    _ => None,
                }
            }
        }

        impl From<$entity> for Record {
            fn from(entity: $entity) -> Self {
                Record::$entity(entity)
            }
        }

        impl From<$new> for NewRecord {
            fn from(new: $new) -> Self {
                NewRecord::$entity(new)
            }
        }
    };
}

impl_entity!(Patient, NewPatient);
impl_entity!(MedicalRecord, NewMedicalRecord);
impl_entity!(Examination, NewExamination);
impl_entity!(Prescription, NewPrescription);
impl_entity!(ExaminationFile, NewExaminationFile);
