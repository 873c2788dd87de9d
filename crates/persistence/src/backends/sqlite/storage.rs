//! EntityStore and query trait implementations for SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, TransactionBehavior};
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

use super::tables::{self, select_by_id, select_where};
use super::SqliteBackend;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Maps a rusqlite error, recognising constraint violations.
fn sqlite_error(context: &str, err: rusqlite::Error) -> StorageError {
    if let rusqlite::Error::SqliteFailure(failure, detail) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            let message = detail.clone().unwrap_or_else(|| failure.to_string());
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return ConstraintError::UniqueViolation { message }.into();
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return ConstraintError::ForeignKeyViolation { message }.into();
                }
                _ => {}
            }
        }
    }
    internal_error(format!("{}: {}", context, err))
}

/// Loads a patient's examinations with prescriptions and files in three
/// queries.
fn load_examination_details(
    conn: &Connection,
    patient: &Patient,
) -> rusqlite::Result<Vec<ExaminationDetails>> {
    let examinations: Vec<Examination> =
        select_where(conn, "patient_id = ?1", params![patient.id])?;
    if examinations.is_empty() {
        return Ok(Vec::new());
    }

    let prescriptions: Vec<Prescription> = select_where(
        conn,
        "examination_id IN (SELECT id FROM examinations WHERE patient_id = ?1)",
        params![patient.id],
    )?;
    let files: Vec<ExaminationFile> = select_where(
        conn,
        "examination_id IN (SELECT id FROM examinations WHERE patient_id = ?1)",
        params![patient.id],
    )?;

    Ok(ExaminationDetails::assemble(
        patient,
        examinations,
        prescriptions,
        files,
    ))
}

#[async_trait]
impl EntityStore for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch(&self, kind: EntityKind, id: EntityId) -> StorageResult<Option<Record>> {
        let conn = self.get_connection()?;
        tables::fetch_record(&conn, kind, id)
            .map_err(|e| sqlite_error(&format!("Failed to read {}", kind), e))
    }

    async fn fetch_all(&self, kind: EntityKind) -> StorageResult<Vec<Record>> {
        let conn = self.get_connection()?;
        tables::fetch_all_records(&conn, kind)
            .map_err(|e| sqlite_error(&format!("Failed to list {}", kind), e))
    }

    async fn save(&self, work: UnitOfWork) -> StorageResult<SaveReceipt> {
        let mut conn = self.get_connection()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| sqlite_error("Failed to begin transaction", e))?;

        let now = Utc::now();
        let mut receipt = SaveReceipt::default();

        // Returning early drops `tx`, which rolls back.
        for change in work.into_changes() {
            match change {
                StagedChange::Add(new) => {
                    let kind = new.kind();
                    let id = tables::insert(&tx, &new, now)
                        .map_err(|e| sqlite_error(&format!("Failed to insert {}", kind), e))?;
                    receipt.inserted.push((kind, id));
                }
                StagedChange::Update(record) => {
                    let changed = tables::update(&tx, &record).map_err(|e| {
                        sqlite_error(&format!("Failed to update {}", record.kind()), e)
                    })?;
                    if changed == 0 {
                        return Err(ConstraintError::StaleEntity {
                            kind: record.kind(),
                            id: record.id(),
                        }
                        .into());
                    }
                    receipt.updated += 1;
                }
                StagedChange::Delete { kind, id } => {
                    let removed = tables::delete(&tx, kind, id)
                        .map_err(|e| sqlite_error(&format!("Failed to delete {}", kind), e))?;
                    if removed == 0 {
                        return Err(ConstraintError::StaleEntity { kind, id }.into());
                    }
                    receipt.deleted += 1;
                }
            }
        }

        tx.commit()
            .map_err(|e| sqlite_error("Failed to commit transaction", e))?;

        debug!(
            inserted = receipt.inserted.len(),
            updated = receipt.updated,
            deleted = receipt.deleted,
            "Committed unit of work"
        );

        Ok(receipt)
    }

    async fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection().map_err(|_| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: "Failed to get connection".to_string(),
            })
        })?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| internal_error(format!("Health check failed: {}", e)))
    }
}

#[async_trait]
impl PatientStore for SqliteBackend {
    async fn get_by_oib(&self, oib: &str) -> StorageResult<Option<Patient>> {
        let conn = self.get_connection()?;
        let mut rows: Vec<Patient> = select_where(&conn, "oib = ?1", params![oib])
            .map_err(|e| sqlite_error("Failed to look up patient by OIB", e))?;
        Ok(rows.pop())
    }

    async fn search(&self, term: &str) -> StorageResult<Vec<Patient>> {
        let conn = self.get_connection()?;
        select_where(
            &conn,
            "instr(lower(last_name), lower(?1)) > 0 OR instr(lower(oib), lower(?1)) > 0",
            params![term],
        )
        .map_err(|e| sqlite_error("Failed to search patients", e))
    }

    async fn get_patient_with_details(
        &self,
        id: EntityId,
    ) -> StorageResult<Option<PatientDetails>> {
        let conn = self.get_connection()?;
        let map = |e| sqlite_error("Failed to load patient details", e);

        let Some(patient) = select_by_id::<Patient>(&conn, id).map_err(map)? else {
            return Ok(None);
        };
        let medical_records: Vec<MedicalRecord> =
            select_where(&conn, "patient_id = ?1", params![id]).map_err(map)?;
        let examinations = load_examination_details(&conn, &patient).map_err(map)?;

        Ok(Some(PatientDetails {
            patient,
            medical_records,
            examinations,
        }))
    }
}

#[async_trait]
impl MedicalRecordStore for SqliteBackend {
    async fn get_records_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<MedicalRecord>> {
        let conn = self.get_connection()?;
        select_where(&conn, "patient_id = ?1", params![patient_id])
            .map_err(|e| sqlite_error("Failed to list medical records", e))
    }
}

#[async_trait]
impl ExaminationStore for SqliteBackend {
    async fn get_examinations_by_patient_id(
        &self,
        patient_id: EntityId,
    ) -> StorageResult<Vec<ExaminationDetails>> {
        let conn = self.get_connection()?;
        let map = |e| sqlite_error("Failed to list examinations", e);

        match select_by_id::<Patient>(&conn, patient_id).map_err(map)? {
            Some(patient) => load_examination_details(&conn, &patient).map_err(map),
            None => Ok(Vec::new()),
        }
    }

    async fn get_examination_with_details(
        &self,
        id: EntityId,
    ) -> StorageResult<Option<ExaminationDetails>> {
        let conn = self.get_connection()?;
        let map = |e| sqlite_error("Failed to load examination details", e);

        let Some(examination) = select_by_id::<Examination>(&conn, id).map_err(map)? else {
            return Ok(None);
        };
        let Some(patient) = select_by_id::<Patient>(&conn, examination.patient_id).map_err(map)?
        else {
            return Ok(None);
        };
        let prescriptions: Vec<Prescription> =
            select_where(&conn, "examination_id = ?1", params![id]).map_err(map)?;
        let files: Vec<ExaminationFile> =
            select_where(&conn, "examination_id = ?1", params![id]).map_err(map)?;

        Ok(
            ExaminationDetails::assemble(&patient, vec![examination], prescriptions, files)
                .pop(),
        )
    }
}

#[async_trait]
impl PrescriptionStore for SqliteBackend {
    async fn get_prescriptions_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<Prescription>> {
        let conn = self.get_connection()?;
        select_where(&conn, "examination_id = ?1", params![examination_id])
            .map_err(|e| sqlite_error("Failed to list prescriptions", e))
    }
}

#[async_trait]
impl ExaminationFileStore for SqliteBackend {
    async fn get_files_by_examination_id(
        &self,
        examination_id: EntityId,
    ) -> StorageResult<Vec<ExaminationFile>> {
        let conn = self.get_connection()?;
        select_where(&conn, "examination_id = ?1", params![examination_id])
            .map_err(|e| sqlite_error("Failed to list files", e))
    }
}
