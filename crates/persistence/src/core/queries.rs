//! Entity-specific query traits.

use async_trait::async_trait;

use crate::core::EntityStore;
use crate::error::StorageResult;
use crate::models::{
    EntityId, ExaminationDetails, ExaminationFile, MedicalRecord, Patient, PatientDetails,
    Prescription,
};

/// Patient lookups.
#[async_trait]
pub trait PatientStore: EntityStore {
    /// Finds a patient by OIB (exact match).
    async fn get_by_oib(&self, oib: &str) -> StorageResult<Option<Patient>>;

    /// Case-insensitive substring match on last name or OIB, ordered by id.
    async fn search(&self, term: &str) -> StorageResult<Vec<Patient>>;

    /// Loads a patient with medical records and examinations (each with
    /// prescriptions and files).
    async fn get_patient_with_details(&self, id: EntityId)
    -> StorageResult<Option<PatientDetails>>;
}

/// Medical record lookups.
#[async_trait]
pub trait MedicalRecordStore: EntityStore {
    /// Lists a patient's medical records, ordered by id.
    async fn get_records_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<MedicalRecord>>;
}

/// Examination lookups.
#[async_trait]
pub trait ExaminationStore: EntityStore {
    /// Lists a patient's examinations with their children, ordered by id.
    ///
    /// Returns an empty list when the patient does not exist.
    async fn get_examinations_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<ExaminationDetails>>;

    /// Loads one examination with its patient and children.
    async fn get_examination_with_details(
        &self,
        id: EntityId,
    ) -> StorageResult<Option<ExaminationDetails>>;
}

/// Prescription lookups.
#[async_trait]
pub trait PrescriptionStore: EntityStore {
    /// Lists an examination's prescriptions, ordered by id.
    async fn get_prescriptions_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<Prescription>>;
}

/// Examination file lookups.
#[async_trait]
pub trait ExaminationFileStore: EntityStore {
    /// Lists an examination's files, ordered by id.
    async fn get_files_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<ExaminationFile>>;
}

/// Everything the service layer needs from a backend.
pub trait MedicalStore:
    PatientStore + MedicalRecordStore + ExaminationStore + PrescriptionStore + ExaminationFileStore
{
}

impl<T> MedicalStore for T where
    T: PatientStore
        + MedicalRecordStore
        + ExaminationStore
        + PrescriptionStore
        + ExaminationFileStore
{
}
