use std::sync::Arc;

use medsys_persistence::models::{EntityId, EntityKind, Examination, Prescription};
use medsys_persistence::{EntityStoreExt, MedicalStore, UnitOfWork};
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use crate::dto::{PrescriptionDto, PrescriptionRequest};

/// Prescription operations, scoped to one examination.
pub struct PrescriptionService<S> {
    store: Arc<S>,
}

impl<S: MedicalStore> PrescriptionService<S> {
    /// Creates the service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists an examination's prescriptions.
    pub async fn list(&self, examination_id: EntityId) -> ServiceResult<Vec<PrescriptionDto>> {
        self.examination(examination_id).await?;
        let prescriptions = self
            .store
            .get_prescriptions_by_examination_id(examination_id)
            .await?;

        info!(examination_id, count = prescriptions.len(), "Retrieved prescriptions");
        Ok(prescriptions.into_iter().map(PrescriptionDto::from).collect())
    }

    /// Issues a prescription during an examination.
    pub async fn create(
        &self,
        examination_id: EntityId,
        request: PrescriptionRequest,
    ) -> ServiceResult<PrescriptionDto> {
        self.examination(examination_id).await?;
        let prescription = self
            .store
            .insert::<Prescription>(request.into_new(examination_id))
            .await?;

        info!(prescription_id = prescription.id, examination_id, "Created prescription");
        Ok(prescription.into())
    }

    /// Replaces the mutable fields of a prescription.
    pub async fn update(
        &self,
        examination_id: EntityId,
        id: EntityId,
        request: PrescriptionRequest,
    ) -> ServiceResult<()> {
        self.examination(examination_id).await?;
        let mut prescription = self.owned_prescription(examination_id, id).await?;
        request.apply_to(&mut prescription);

        let mut work = UnitOfWork::new();
        work.update(prescription);
        self.store.save(work).await?;

        info!(prescription_id = id, examination_id, "Updated prescription");
        Ok(())
    }

    /// Deletes a prescription.
    pub async fn delete(&self, examination_id: EntityId, id: EntityId) -> ServiceResult<()> {
        self.examination(examination_id).await?;
        self.owned_prescription(examination_id, id).await?;

        let mut work = UnitOfWork::new();
        work.delete::<Prescription>(id);
        self.store.save(work).await?;

        info!(prescription_id = id, examination_id, "Deleted prescription");
        Ok(())
    }

    async fn examination(&self, examination_id: EntityId) -> ServiceResult<Examination> {
        self.store
            .get_by_id::<Examination>(examination_id)
            .await?
            .ok_or_else(|| {
                warn!(examination_id, "Examination not found");
                ServiceError::not_found(EntityKind::Examination)
            })
    }

    async fn owned_prescription(
        &self,
        examination_id: EntityId,
        id: EntityId,
    ) -> ServiceResult<Prescription> {
        match self.store.get_by_id::<Prescription>(id).await? {
            Some(prescription) if prescription.examination_id == examination_id => {
                Ok(prescription)
            }
            _ => {
                warn!(prescription_id = id, examination_id, "Prescription not found for examination");
                Err(ServiceError::not_found(EntityKind::Prescription))
            }
        }
    }
}
