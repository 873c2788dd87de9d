//! Row mapping between entity structs and PostgreSQL tables.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use tokio_postgres::types::{FromSql, ToSql};
use tokio_postgres::{Client, Row, Transaction};

use crate::error::{BackendError, ConstraintError, StorageError, StorageResult};
use crate::models::{
    EntityId, EntityKind, Examination, ExaminationFile, MedicalRecord, NewRecord, Patient,
    Prescription, Record,
};

pub(super) type SqlParams<'a> = &'a [&'a (dyn ToSql + Sync)];

pub(super) fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "postgres".to_string(),
        message,
        source: None,
    })
}

/// Maps a tokio-postgres error, recognising constraint violations.
pub(super) fn pg_error(context: &str, err: tokio_postgres::Error) -> StorageError {
    use tokio_postgres::error::SqlState;

    if let Some(db_error) = err.as_db_error() {
        let message = db_error.message().to_string();
        if *db_error.code() == SqlState::UNIQUE_VIOLATION {
            return ConstraintError::UniqueViolation { message }.into();
        }
        if *db_error.code() == SqlState::FOREIGN_KEY_VIOLATION {
            return ConstraintError::ForeignKeyViolation { message }.into();
        }
    }
    internal_error(format!("{}: {}", context, err))
}

fn column<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> StorageResult<T> {
    row.try_get(idx).map_err(|e| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("column {}: {}", idx, e),
        })
    })
}

fn parsed_column<T>(row: &Row, idx: usize) -> StorageResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = column(row, idx)?;
    raw.parse().map_err(|e: T::Err| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("column {}: {}", idx, e),
        })
    })
}

/// An entity struct that maps onto one PostgreSQL table.
pub(super) trait PgRow: Sized {
    const KIND: EntityKind;
    const COLUMNS: &'static str;

    fn from_row(row: &Row) -> StorageResult<Self>;
}

impl PgRow for Patient {
    const KIND: EntityKind = EntityKind::Patient;
    const COLUMNS: &'static str =
        "id, oib, first_name, last_name, date_of_birth, gender, created_at";

    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(Patient {
            id: column(row, 0)?,
            oib: column(row, 1)?,
            first_name: column(row, 2)?,
            last_name: column(row, 3)?,
            date_of_birth: column(row, 4)?,
            gender: parsed_column(row, 5)?,
            created_at: column(row, 6)?,
        })
    }
}

impl PgRow for MedicalRecord {
    const KIND: EntityKind = EntityKind::MedicalRecord;
    const COLUMNS: &'static str =
        "id, patient_id, disease_name, start_date, end_date, description, created_at";

    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(MedicalRecord {
            id: column(row, 0)?,
            patient_id: column(row, 1)?,
            disease_name: column(row, 2)?,
            start_date: column(row, 3)?,
            end_date: column(row, 4)?,
            description: column(row, 5)?,
            created_at: column(row, 6)?,
        })
    }
}

impl PgRow for Examination {
    const KIND: EntityKind = EntityKind::Examination;
    const COLUMNS: &'static str =
        "id, patient_id, examination_type, examination_date, notes, created_at";

    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(Examination {
            id: column(row, 0)?,
            patient_id: column(row, 1)?,
            examination_type: parsed_column(row, 2)?,
            examination_date: column(row, 3)?,
            notes: column(row, 4)?,
            created_at: column(row, 5)?,
        })
    }
}

impl PgRow for Prescription {
    const KIND: EntityKind = EntityKind::Prescription;
    const COLUMNS: &'static str = "id, examination_id, medication_name, dosage, instructions, prescription_date, created_at";

    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(Prescription {
            id: column(row, 0)?,
            examination_id: column(row, 1)?,
            medication_name: column(row, 2)?,
            dosage: column(row, 3)?,
            instructions: column(row, 4)?,
            prescription_date: column(row, 5)?,
            created_at: column(row, 6)?,
        })
    }
}

impl PgRow for ExaminationFile {
    const KIND: EntityKind = EntityKind::ExaminationFile;
    const COLUMNS: &'static str =
        "id, examination_id, file_name, file_path, file_size, upload_date";

    fn from_row(row: &Row) -> StorageResult<Self> {
        Ok(ExaminationFile {
            id: column(row, 0)?,
            examination_id: column(row, 1)?,
            file_name: column(row, 2)?,
            file_path: column(row, 3)?,
            file_size: column(row, 4)?,
            upload_date: column(row, 5)?,
        })
    }
}

pub(super) async fn select_by_id<T: PgRow>(
    client: &Client,
    id: EntityId,
) -> StorageResult<Option<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = $1",
        T::COLUMNS,
        T::KIND.table_name()
    );
    let row = client
        .query_opt(&sql, &[&id])
        .await
        .map_err(|e| pg_error(&format!("Failed to read {}", T::KIND), e))?;
    row.as_ref().map(T::from_row).transpose()
}

/// Selects rows matching `filter` (a SQL boolean expression), ordered by id.
pub(super) async fn select_where<T: PgRow>(
    client: &Client,
    filter: &str,
    params: SqlParams<'_>,
) -> StorageResult<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY id",
        T::COLUMNS,
        T::KIND.table_name(),
        filter
    );
    let rows = client
        .query(&sql, params)
        .await
        .map_err(|e| pg_error(&format!("Failed to query {}", T::KIND), e))?;
    rows.iter().map(T::from_row).collect()
}

async fn select_all<T: PgRow + Into<Record>>(client: &Client) -> StorageResult<Vec<Record>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY id",
        T::COLUMNS,
        T::KIND.table_name()
    );
    let rows = client
        .query(&sql, &[])
        .await
        .map_err(|e| pg_error(&format!("Failed to list {}", T::KIND), e))?;
    rows.iter()
        .map(|row| T::from_row(row).map(Into::into))
        .collect()
}

pub(super) async fn fetch_record(
    client: &Client,
    kind: EntityKind,
    id: EntityId,
) -> StorageResult<Option<Record>> {
    Ok(match kind {
        EntityKind::Patient => select_by_id::<Patient>(client, id).await?.map(Record::from),
        EntityKind::MedicalRecord => select_by_id::<MedicalRecord>(client, id)
            .await?
            .map(Record::from),
        EntityKind::Examination => select_by_id::<Examination>(client, id)
            .await?
            .map(Record::from),
        EntityKind::Prescription => select_by_id::<Prescription>(client, id)
            .await?
            .map(Record::from),
        EntityKind::ExaminationFile => select_by_id::<ExaminationFile>(client, id)
            .await?
            .map(Record::from),
    })
}

pub(super) async fn fetch_all_records(
    client: &Client,
    kind: EntityKind,
) -> StorageResult<Vec<Record>> {
    match kind {
        EntityKind::Patient => select_all::<Patient>(client).await,
        EntityKind::MedicalRecord => select_all::<MedicalRecord>(client).await,
        EntityKind::Examination => select_all::<Examination>(client).await,
        EntityKind::Prescription => select_all::<Prescription>(client).await,
        EntityKind::ExaminationFile => select_all::<ExaminationFile>(client).await,
    }
}

/// Inserts a row and returns its assigned id.
pub(super) async fn insert(
    tx: &Transaction<'_>,
    new: &NewRecord,
    now: DateTime<Utc>,
) -> StorageResult<EntityId> {
    let row = match new {
        NewRecord::Patient(p) => {
            let gender = p.gender.as_code();
            tx.query_one(
                "INSERT INTO patients (oib, first_name, last_name, date_of_birth, gender, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                &[
                    &p.oib,
                    &p.first_name,
                    &p.last_name,
                    &p.date_of_birth,
                    &gender,
                    &now,
                ],
            )
            .await
        }
        NewRecord::MedicalRecord(r) => {
            tx.query_one(
                "INSERT INTO medical_records (patient_id, disease_name, start_date, end_date, description, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                &[
                    &r.patient_id,
                    &r.disease_name,
                    &r.start_date,
                    &r.end_date,
                    &r.description,
                    &now,
                ],
            )
            .await
        }
        NewRecord::Examination(e) => {
            let examination_type = e.examination_type.as_code();
            tx.query_one(
                "INSERT INTO examinations (patient_id, examination_type, examination_date, notes, created_at)
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
                &[
                    &e.patient_id,
                    &examination_type,
                    &e.examination_date,
                    &e.notes,
                    &now,
                ],
            )
            .await
        }
        NewRecord::Prescription(p) => {
            tx.query_one(
                "INSERT INTO prescriptions (examination_id, medication_name, dosage, instructions, prescription_date, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
                &[
                    &p.examination_id,
                    &p.medication_name,
                    &p.dosage,
                    &p.instructions,
                    &p.prescription_date,
                    &now,
                ],
            )
            .await
        }
        NewRecord::ExaminationFile(f) => {
            tx.query_one(
                "INSERT INTO examination_files (examination_id, file_name, file_path, file_size, upload_date)
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
                &[
                    &f.examination_id,
                    &f.file_name,
                    &f.file_path,
                    &f.file_size,
                    &now,
                ],
            )
            .await
        }
    }
    .map_err(|e| pg_error(&format!("Failed to insert {}", new.kind()), e))?;

    column(&row, 0)
}

/// Overwrites the mutable columns of a row. Returns the number of rows changed.
pub(super) async fn update(tx: &Transaction<'_>, record: &Record) -> StorageResult<u64> {
    match record {
        Record::Patient(p) => {
            let gender = p.gender.as_code();
            tx.execute(
                "UPDATE patients SET first_name = $1, last_name = $2, date_of_birth = $3, gender = $4
                 WHERE id = $5",
                &[&p.first_name, &p.last_name, &p.date_of_birth, &gender, &p.id],
            )
            .await
        }
        Record::MedicalRecord(r) => {
            tx.execute(
                "UPDATE medical_records SET disease_name = $1, start_date = $2, end_date = $3, description = $4
                 WHERE id = $5",
                &[&r.disease_name, &r.start_date, &r.end_date, &r.description, &r.id],
            )
            .await
        }
        Record::Examination(e) => {
            let examination_type = e.examination_type.as_code();
            tx.execute(
                "UPDATE examinations SET examination_type = $1, examination_date = $2, notes = $3
                 WHERE id = $4",
                &[&examination_type, &e.examination_date, &e.notes, &e.id],
            )
            .await
        }
        Record::Prescription(p) => {
            tx.execute(
                "UPDATE prescriptions SET medication_name = $1, dosage = $2, instructions = $3, prescription_date = $4
                 WHERE id = $5",
                &[
                    &p.medication_name,
                    &p.dosage,
                    &p.instructions,
                    &p.prescription_date,
                    &p.id,
                ],
            )
            .await
        }
        Record::ExaminationFile(f) => {
            tx.execute(
                "UPDATE examination_files SET file_name = $1, file_path = $2, file_size = $3
                 WHERE id = $4",
                &[&f.file_name, &f.file_path, &f.file_size, &f.id],
            )
            .await
        }
    }
    .map_err(|e| pg_error(&format!("Failed to update {}", record.kind()), e))
}

/// Deletes a row. Returns the number of rows removed.
pub(super) async fn delete(
    tx: &Transaction<'_>,
    kind: EntityKind,
    id: EntityId,
) -> StorageResult<u64> {
    let sql = format!("DELETE FROM {} WHERE id = $1", kind.table_name());
    tx.execute(&sql, &[&id])
        .await
        .map_err(|e| pg_error(&format!("Failed to delete {}", kind), e))
}
