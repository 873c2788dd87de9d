use std::sync::Arc;

use medsys_persistence::models::{EntityId, EntityKind, Patient};
use medsys_persistence::{EntityStoreExt, MedicalStore, UnitOfWork};
use tracing::{debug, info, warn};

use super::{ServiceError, ServiceResult};
use crate::dto::{CreatePatientRequest, PatientDetailsDto, PatientDto, UpdatePatientRequest};

const DUPLICATE_OIB: &str = "Patient with this OIB already exists";

/// Patient operations.
pub struct PatientService<S> {
    store: Arc<S>,
}

impl<S: MedicalStore> PatientService<S> {
    /// Creates the service over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists all patients, or those matching `search` on last name or OIB.
    pub async fn list(&self, search: Option<&str>) -> ServiceResult<Vec<PatientDto>> {
        let patients = match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => {
                let found = self.store.search(term).await?;
                info!(term = %term, count = found.len(), "Searched patients");
                found
            }
            None => self.store.get_all::<Patient>().await?,
        };
        Ok(patients.into_iter().map(PatientDto::from).collect())
    }

    /// Loads one patient.
    pub async fn get(&self, id: EntityId) -> ServiceResult<PatientDto> {
        Ok(self.load(id).await?.into())
    }

    /// Loads one patient by OIB.
    pub async fn get_by_oib(&self, oib: &str) -> ServiceResult<PatientDto> {
        match self.store.get_by_oib(oib).await? {
            Some(patient) => Ok(patient.into()),
            None => {
                warn!(oib = %oib, "Patient not found by OIB");
                Err(ServiceError::not_found(EntityKind::Patient))
            }
        }
    }

    /// Loads a patient with medical records and examinations.
    pub async fn get_details(&self, id: EntityId) -> ServiceResult<PatientDetailsDto> {
        match self.store.get_patient_with_details(id).await? {
            Some(details) => Ok(details.into()),
            None => Err(ServiceError::not_found(EntityKind::Patient)),
        }
    }

    /// Registers a patient.
    ///
    /// Fails with [`ServiceError::Conflict`] if the OIB is taken, including
    /// when a concurrent insert wins the race past the lookup.
    pub async fn create(&self, request: CreatePatientRequest) -> ServiceResult<PatientDto> {
        if self.store.get_by_oib(&request.oib).await?.is_some() {
            warn!(oib = %request.oib, "Duplicate OIB");
            return Err(ServiceError::Conflict(DUPLICATE_OIB.to_string()));
        }

        let patient = match self.store.insert::<Patient>(request.into()).await {
            Ok(patient) => patient,
            Err(e) if e.is_unique_violation() => {
                return Err(ServiceError::Conflict(DUPLICATE_OIB.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        info!(patient_id = patient.id, "Created patient");
        Ok(patient.into())
    }

    /// Replaces the mutable fields of a patient. The OIB never changes.
    pub async fn update(&self, id: EntityId, request: UpdatePatientRequest) -> ServiceResult<()> {
        let mut patient = self.load(id).await?;
        request.apply_to(&mut patient);

        let mut work = UnitOfWork::new();
        work.update(patient);
        self.store.save(work).await?;

        info!(patient_id = id, "Updated patient");
        Ok(())
    }

    /// Deletes a patient and, by cascade, everything they own.
    ///
    /// Blobs of the patient's examination files stay in the blob store.
    pub async fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.load(id).await?;

        let orphaned: usize = self
            .store
            .get_examinations_by_patient_id(id)
            .await?
            .iter()
            .map(|examination| examination.files.len())
            .sum();

        let mut work = UnitOfWork::new();
        work.delete::<Patient>(id);
        self.store.save(work).await?;

        if orphaned > 0 {
            warn!(
                patient_id = id,
                orphaned_blobs = orphaned,
                "Deleted patient; examination file blobs were left in storage"
            );
        }
        info!(patient_id = id, "Deleted patient");
        Ok(())
    }

    async fn load(&self, id: EntityId) -> ServiceResult<Patient> {
        match self.store.get_by_id::<Patient>(id).await? {
            Some(patient) => Ok(patient),
            None => {
                debug!(patient_id = id, "Patient not found");
                Err(ServiceError::not_found(EntityKind::Patient))
            }
        }
    }
}
