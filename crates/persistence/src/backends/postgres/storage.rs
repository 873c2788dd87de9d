//! EntityStore and query trait implementations for PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use tokio_postgres::Client;
use tracing::debug;

use crate::core::{
    EntityStore, ExaminationFileStore, ExaminationStore, MedicalRecordStore, PatientStore,
    PrescriptionStore, SaveReceipt, StagedChange, UnitOfWork,
};
use crate::error::{BackendError, ConstraintError, StorageError, StorageResult};
use crate::models::{
    EntityId, EntityKind, Examination, ExaminationDetails, ExaminationFile, MedicalRecord,
    Patient, PatientDetails, Prescription, Record,
};

use super::tables::{self, internal_error, pg_error, select_by_id, select_where};
use super::PostgresBackend;

async fn load_examination_details(
    client: &Client,
    patient: &Patient,
) -> StorageResult<Vec<ExaminationDetails>> {
    let examinations: Vec<Examination> =
        select_where(client, "patient_id = $1", &[&patient.id]).await?;
    if examinations.is_empty() {
        return Ok(Vec::new());
    }

    let prescriptions: Vec<Prescription> = select_where(
        client,
        "examination_id IN (SELECT id FROM examinations WHERE patient_id = $1)",
        &[&patient.id],
    )
    .await?;
    let files: Vec<ExaminationFile> = select_where(
        client,
        "examination_id IN (SELECT id FROM examinations WHERE patient_id = $1)",
        &[&patient.id],
    )
    .await?;

    Ok(ExaminationDetails::assemble(
        patient,
        examinations,
        prescriptions,
        files,
    ))
}

#[async_trait]
impl EntityStore for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn fetch(&self, kind: EntityKind, id: EntityId) -> StorageResult<Option<Record>> {
        let client = self.get_client().await?;
        tables::fetch_record(&client, kind, id).await
    }

    async fn fetch_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>> {
        let client = self.get_client().await?;
        tables::fetch_all_records(&client, kind).await
    }

    async fn save(&self, work: UnitOfWork) -> StorageResult<SaveReceipt> {
        let mut client = self.get_client().await?;
        let tx = client
            .transaction()
            .await
            .map_err(|e| pg_error("Failed to begin transaction", e))?;

        let now = Utc::now();
        let mut receipt = SaveReceipt::default();

        // Returning early drops `tx`, which rolls back.
        for change in work.into_changes() {
            match change {
                StagedChange::Add(new) => {
                    let id = tables::insert(&tx, &new, now).await?;
                    receipt.inserted.push((new.kind(), id));
                }
                StagedChange::Update(record) => {
                    if tables::update(&tx, &record).await? == 0 {
                        return Err(ConstraintError::StaleEntity {
                            kind: record.kind(),
                            id: record.id(),
                        }
                        .into());
                    }
                    receipt.updated += 1;
                }
                StagedChange::Delete { kind, id } => {
                    if tables::delete(&tx, kind, id).await? == 0 {
                        return Err(ConstraintError::StaleEntity { kind, id }.into());
                    }
                    receipt.deleted += 1;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| pg_error("Failed to commit transaction", e))?;

        debug!(
            inserted = receipt.inserted.len(),
            updated = receipt.updated,
            deleted = receipt.deleted,
            "Committed unit of work"
        );

        Ok(receipt)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let client = self.get_client().await.map_err(|_| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "postgres".to_string(),
                message: "Failed to get connection".to_string(),
            })
        })?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| internal_error(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl PatientStore for PostgresBackend {
    async fn get_by_oib(&self, oib: &str) -> StorageResult<Option<Patient>> {
        let client = self.get_client().await?;
        let mut rows: Vec<Patient> = select_where(&client, "oib = $1", &[&oib]).await?;
        Ok(rows.pop())
    }

    async fn search(&self, term: &str) -> StorageResult<Vec<Patient>> {
        let client = self.get_client().await?;
        select_where(
            &client,
            "strpos(lower(last_name), lower($1)) > 0 OR strpos(lower(oib), lower($1)) > 0",
            &[&term],
        )
        .await
    }

    async fn get_patient_with_details(
        &self,
        id: EntityId,
    ) -> StorageResult<Option<PatientDetails>> {
        let client = self.get_client().await?;

        let Some(patient) = select_by_id::<Patient>(&client, id).await? else {
            return Ok(None);
        };
        let medical_records: Vec<MedicalRecord> =
            select_where(&client, "patient_id = $1", &[&id]).await?;
        let examinations = load_examination_details(&client, &patient).await?;

        Ok(Some(PatientDetails {
            patient,
            medical_records,
            examinations,
        }))
    }
}

#[async_trait]
impl MedicalRecordStore for PostgresBackend {
    async fn get_records_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<MedicalRecord>> {
        let client = self.get_client().await?;
        select_where(&client, "patient_id = $1", &[&patient_id]).await
    }
}

#[async_trait]
impl ExaminationStore for PostgresBackend {
    async fn get_examinations_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<ExaminationDetails>> {
        let client = self.get_client().await?;
        match select_by_id::<Patient>(&client, patient_id).await? {
            Some(patient) => load_examination_details(&client, &patient).await,
            None => Ok(Vec::new()),
        }
    }

    async fn get_examination_with_details(
        &self,
        id: EntityId,
    ) -> StorageResult<Option<ExaminationDetails>> {
        let client = self.get_client().await?;

        let Some(examination) = select_by_id::<Examination>(&client, id).await? else {
            return Ok(None);
        };
        let Some(patient) = select_by_id::<Patient>(&client, examination.patient_id).await? else {
            return Ok(None);
        };
        let prescriptions: Vec<Prescription> =
            select_where(&client, "examination_id = $1", &[&id]).await?;
        let files: Vec<ExaminationFile> =
            select_where(&client, "examination_id = $1", &[&id]).await?;

        Ok(
            ExaminationDetails::assemble(&patient, vec![examination], prescriptions, files)
                .pop(),
        )
    }
}

#[async_trait]
impl PrescriptionStore for PostgresBackend {
    async fn get_prescriptions_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<Prescription>> {
        let client = self.get_client().await?;
        select_where(&client, "examination_id = $1", &[&examination_id]).await
    }
}

#[async_trait]
impl ExaminationFileStore for PostgresBackend {
    async fn get_files_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<ExaminationFile>> {
        let client = self.get_client().await?;
        select_where(&client, "examination_id = $1", &[&examination_id]).await
    }
}
