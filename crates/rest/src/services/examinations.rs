use std::sync::Arc;

use medsys_persistence::models::{
    EntityId, EntityKind, Examination, ExaminationDetails, Patient,
};
use medsys_persistence::{EntityStoreExt, MedicalStore, UnitOfWork};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::dto::{ExaminationDto, ExaminationRequest};

/// Examination operations, scoped to one patient.
pub struct ExaminationService<S> {
    store: Arc<S>,
}

impl<S: MedicalStore> ExaminationService<S> {
    /// Creates the service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists a patient's examinations with prescriptions and files.
    pub async fn list(&self, patient_id: EntityId) -> ServiceResult<Vec<ExaminationDto>> {
        self.patient(patient_id).await?;
        let examinations = self.store.get_examinations_by_patient_id(patient_id).await?;

        info!(patient_id, count = examinations.len(), "Retrieved examinations");
        Ok(examinations.into_iter().map(ExaminationDto::from).collect())
    }

    /// Loads one of a patient's examinations with prescriptions and files.
    pub async fn get(&self, patient_id: EntityId, id: EntityId) -> ServiceResult<ExaminationDto> {
        self.patient(patient_id).await?;
        Ok(self.owned_details(patient_id, id).await?.into())
    }

    /// Records an examination for a patient.
    pub async fn create(
        &self,
        patient_id: EntityId,
        request: ExaminationRequest,
    ) -> ServiceResult<ExaminationDto> {
        let patient = self.patient(patient_id).await?;
        let examination = self
            .store
            .insert::<Examination>(request.into_new(patient_id))
            .await?;

        info!(examination_id = examination.id, patient_id, "Created examination");
        Ok(ExaminationDetails {
            examination,
            patient,
            prescriptions: Vec::new(),
            files: Vec::new(),
        }
        .into())
    }

    /// Replaces the type, date and notes of an examination.
    pub async fn update(
        &self,
        patient_id: EntityId,
        id: EntityId,
        request: ExaminationRequest,
    ) -> ServiceResult<()> {
        self.patient(patient_id).await?;
        let mut examination = self.owned_details(patient_id, id).await?.examination;
        request.apply_to(&mut examination);

        let mut work = UnitOfWork::new();
        work.update(examination);
        self.store.save(work).await?;

        info!(examination_id = id, patient_id, "Updated examination");
        Ok(())
    }

    /// Deletes an examination with its prescriptions and file records.
    pub async fn delete(&self, patient_id: EntityId, id: EntityId) -> ServiceResult<()> {
        self.patient(patient_id).await?;
        let details = self.owned_details(patient_id, id).await?;

        let mut work = UnitOfWork::new();
        work.delete::<Examination>(id);
        self.store.save(work).await?;

        if !details.files.is_empty() {
            warn!(
                examination_id = id,
                orphaned_blobs = details.files.len(),
                "Deleted examination; file blobs were left in storage"
            );
        }
        info!(examination_id = id, patient_id, "Deleted examination");
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

    async fn owned_details(
        &self,
        patient_id: EntityId,
        id: EntityId,
    ) -> ServiceResult<ExaminationDetails> {
        match self.store.get_examination_with_details(id).await? {
            Some(details) if details.examination.patient_id == patient_id => Ok(details),
            _ => {
                warn!(examination_id = id, patient_id, "Examination not found for patient");
                Err(ServiceError::not_found(EntityKind::Examination))
            }
        }
    }
}
