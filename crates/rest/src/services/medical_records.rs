use std::sync::Arc;

use medsys_persistence::models::{EntityId, EntityKind, MedicalRecord, Patient};
use medsys_persistence::{EntityStoreExt, MedicalStore, UnitOfWork};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::dto::{CreateMedicalRecordRequest, MedicalRecordDto, UpdateMedicalRecordRequest};

/// Medical record operations, scoped to one patient.
pub struct MedicalRecordService<S> {
    store: Arc<S>,
}

impl<S: MedicalStore> MedicalRecordService<S> {
    /// Creates the service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists a patient's medical records.
    pub async fn list(&self, patient_id: EntityId) -> ServiceResult<Vec<MedicalRecordDto>> {
        let patient = self.patient(patient_id).await?;
        let records = self.store.get_records_by_patient_id(patient_id).await?;

        info!(patient_id, count = records.len(), "Retrieved medical records");
        Ok(records
            .into_iter()
            .map(|record| MedicalRecordDto::new(record, &patient))
            .collect())
    }

    /// Loads one of a patient's medical records.
    pub async fn get(&self, patient_id: EntityId, id: EntityId) -> ServiceResult<MedicalRecordDto> {
        let patient = self.patient(patient_id).await?;
        let record = self.owned_record(patient_id, id).await?;
        Ok(MedicalRecordDto::new(record, &patient))
    }

    /// Adds a medical record to a patient.
    pub async fn create(
        &self,
        patient_id: EntityId,
        request: CreateMedicalRecordRequest,
    ) -> ServiceResult<MedicalRecordDto> {
        let patient = self.patient(patient_id).await?;
        let record = self
            .store
            .insert::<MedicalRecord>(request.into_new(patient_id))
            .await?;

        info!(record_id = record.id, patient_id, "Created medical record");
        Ok(MedicalRecordDto::new(record, &patient))
    }

    /// Replaces the mutable fields of a medical record.
    pub async fn update(
        &self,
        patient_id: EntityId,
        id: EntityId,
        request: UpdateMedicalRecordRequest,
    ) -> ServiceResult<()> {
        self.patient(patient_id).await?;
        let mut record = self.owned_record(patient_id, id).await?;
        request.apply_to(&mut record);

        let mut work = UnitOfWork::new();
        work.update(record);
        self.store.save(work).await?;

        info!(record_id = id, patient_id, "Updated medical record");
        Ok(())
    }

    /// Deletes a medical record.
    pub async fn delete(&self, patient_id: EntityId, id: EntityId) -> ServiceResult<()> {
        self.patient(patient_id).await?;
        self.owned_record(patient_id, id).await?;

        let mut work = UnitOfWork::new();
        work.delete::<MedicalRecord>(id);
        self.store.save(work).await?;

        info!(record_id = id, patient_id, "Deleted medical record");
        Ok(())
    }

    async fn patient(&self, patient_id: EntityId) -> ServiceResult<Patient> {
        self.store
            .get_by_id::<Patient>(patient_id)
            .await?
            .ok_or_else(|| {
                warn!(patient_id, "Patient not found");
                ServiceError::not_found(EntityKind::Patient)
            })
    }

    async fn owned_record(&self, patient_id: EntityId, id: EntityId) -> ServiceResult<MedicalRecord> {
        match self.store.get_by_id::<MedicalRecord>(id).await? {
            Some(record) if record.patient_id == patient_id => Ok(record),
            _ => {
                warn!(record_id = id, patient_id, "Medical record not found for patient");
                Err(ServiceError::not_found(EntityKind::MedicalRecord))
            }
        }
    }
}
