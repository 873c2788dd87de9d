//! Row mapping between entity structs and SQLite tables.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use crate::models::{
    EntityId, EntityKind, Examination, ExaminationFile, MedicalRecord, NewRecord, Patient,
    Prescription, Record,
};

/// An entity struct that maps onto one SQLite table.
pub(super) trait SqliteRow: Sized {
    const KIND: EntityKind;
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl SqliteRow for Patient {
    const KIND: EntityKind = EntityKind::Patient;
    const COLUMNS: &'static str =
        "id, oib, first_name, last_name, date_of_birth, gender, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Patient {
            id: row.get(0)?,
            oib: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            date_of_birth: row.get(4)?,
            gender: parse_column(row, 5)?,
            created_at: row.get(6)?,
        })
    }
}

impl SqliteRow for MedicalRecord {
    const KIND: EntityKind = EntityKind::MedicalRecord;
    const COLUMNS: &'static str =
        "id, patient_id, disease_name, start_date, end_date, description, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(MedicalRecord {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            disease_name: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            description: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl SqliteRow for Examination {
    const KIND: EntityKind = EntityKind::Examination;
    const COLUMNS: &'static str =
        "id, patient_id, examination_type, examination_date, notes, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Examination {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            examination_type: parse_column(row, 2)?,
            examination_date: row.get(3)?,
            notes: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl SqliteRow for Prescription {
    const KIND: EntityKind = EntityKind::Prescription;
    const COLUMNS: &'static str = "id, examination_id, medication_name, dosage, instructions, prescription_date, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Prescription {
            id: row.get(0)?,
            examination_id: row.get(1)?,
            medication_name: row.get(2)?,
            dosage: row.get(3)?,
            instructions: row.get(4)?,
            prescription_date: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl SqliteRow for ExaminationFile {
    const KIND: EntityKind = EntityKind::ExaminationFile;
    const COLUMNS: &'static str =
        "id, examination_id, file_name, file_path, file_size, upload_date";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ExaminationFile {
            id: row.get(0)?,
            examination_id: row.get(1)?,
            file_name: row.get(2)?,
            file_path: row.get(3)?,
            file_size: row.get(4)?,
            upload_date: row.get(5)?,
        })
    }
}

pub(super) fn select_by_id<T: SqliteRow>(
    conn: &Connection,
    id: EntityId,
) -> rusqlite::Result<Option<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1",
        T::COLUMNS,
        T::KIND.table_name()
    );
    conn.query_row(&sql, [id], |row| T::from_row(row)).optional()
}

pub(super) fn select_all<T: SqliteRow>(conn: &Connection) -> rusqlite::Result<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} ORDER BY id",
        T::COLUMNS,
        T::KIND.table_name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| T::from_row(row))?;
    rows.collect()
}

/// Selects rows matching `filter` (a SQL boolean expression), ordered by id.
pub(super) fn select_where<T: SqliteRow, P: Params>(
    conn: &Connection,
    filter: &str,
    params: P,
) -> rusqlite::Result<Vec<T>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} ORDER BY id",
        T::COLUMNS,
        T::KIND.table_name(),
        filter
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    rows.collect()
}

pub(super) fn fetch_record(
    conn: &Connection,
    kind: EntityKind,
    id: EntityId,
) -> rusqlite::Result<Option<Record>> {
    Ok(match kind {
        EntityKind::Patient => select_by_id::<Patient>(conn, id)?.map(Record::from),
        EntityKind::MedicalRecord => select_by_id::<MedicalRecord>(conn, id)?.map(Record::from),
        EntityKind::Examination => select_by_id::<Examination>(conn, id)?.map(Record::from),
        EntityKind::Prescription => select_by_id::<Prescription>(conn, id)?.map(Record::from),
        EntityKind::ExaminationFile => {
            select_by_id::<ExaminationFile>(conn, id)?.map(Record::from)
        }
    })
}

fn into_records<T: Into<Record>>(rows: Vec<T>) -> Vec<Record> {
    rows.into_iter().map(Into::into).collect()
}

pub(super) fn fetch_all_records(
    conn: &Connection,
    kind: EntityKind,
) -> rusqlite::Result<Vec<Record>> {
    Ok(match kind {
        EntityKind::Patient => into_records(select_all::<Patient>(conn)?),
        EntityKind::MedicalRecord => into_records(select_all::<MedicalRecord>(conn)?),
        EntityKind::Examination => into_records(select_all::<Examination>(conn)?),
        EntityKind::Prescription => into_records(select_all::<Prescription>(conn)?),
        EntityKind::ExaminationFile => into_records(select_all::<ExaminationFile>(conn)?),
    })
}

/// Inserts a row and returns its assigned id.
pub(super) fn insert(
    conn: &Connection,
    new: &NewRecord,
    now: DateTime<Utc>,
) -> rusqlite::Result<EntityId> {
    match new {
        NewRecord::Patient(p) => conn.execute(
            "INSERT INTO patients (oib, first_name, last_name, date_of_birth, gender, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                p.oib,
                p.first_name,
                p.last_name,
                p.date_of_birth,
                p.gender.as_code(),
                now
            ],
        )?,
        NewRecord::MedicalRecord(r) => conn.execute(
            "INSERT INTO medical_records (patient_id, disease_name, start_date, end_date, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                r.patient_id,
                r.disease_name,
                r.start_date,
                r.end_date,
                r.description,
                now
            ],
        )?,
        NewRecord::Examination(e) => conn.execute(
            "INSERT INTO examinations (patient_id, examination_type, examination_date, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                e.patient_id,
                e.examination_type.as_code(),
                e.examination_date,
                e.notes,
                now
            ],
        )?,
        NewRecord::Prescription(p) => conn.execute(
            "INSERT INTO prescriptions (examination_id, medication_name, dosage, instructions, prescription_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                p.examination_id,
                p.medication_name,
                p.dosage,
                p.instructions,
                p.prescription_date,
                now
            ],
        )?,
        NewRecord::ExaminationFile(f) => conn.execute(
            "INSERT INTO examination_files (examination_id, file_name, file_path, file_size, upload_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![f.examination_id, f.file_name, f.file_path, f.file_size, now],
        )?,
    };

    Ok(conn.last_insert_rowid())
}

/// Overwrites the mutable columns of a row. Returns the number of rows changed.
///
/// Ids, parent links, the patient OIB and creation timestamps are never
/// written here.
pub(super) fn update(conn: &Connection, record: &Record) -> rusqlite::Result<usize> {
    match record {
        Record::Patient(p) => conn.execute(
            "UPDATE patients SET first_name = ?1, last_name = ?2, date_of_birth = ?3, gender = ?4
             WHERE id = ?5",
            params![
                p.first_name,
                p.last_name,
                p.date_of_birth,
                p.gender.as_code(),
                p.id
            ],
        ),
        Record::MedicalRecord(r) => conn.execute(
            "UPDATE medical_records SET disease_name = ?1, start_date = ?2, end_date = ?3, description = ?4
             WHERE id = ?5",
            params![r.disease_name, r.start_date, r.end_date, r.description, r.id],
        ),
        Record::Examination(e) => conn.execute(
            "UPDATE examinations SET examination_type = ?1, examination_date = ?2, notes = ?3
             WHERE id = ?4",
            params![
                e.examination_type.as_code(),
                e.examination_date,
                e.notes,
                e.id
            ],
        ),
        Record::Prescription(p) => conn.execute(
            "UPDATE prescriptions SET medication_name = ?1, dosage = ?2, instructions = ?3, prescription_date = ?4
             WHERE id = ?5",
            params![
                p.medication_name,
                p.dosage,
                p.instructions,
                p.prescription_date,
                p.id
            ],
        ),
        Record::ExaminationFile(f) => conn.execute(
            "UPDATE examination_files SET file_name = ?1, file_path = ?2, file_size = ?3
             WHERE id = ?4",
            params![f.file_name, f.file_path, f.file_size, f.id],
        ),
    }
}

/// Deletes a row. Returns the number of rows removed.
pub(super) fn delete(conn: &Connection, kind: EntityKind, id: EntityId) -> rusqlite::Result<usize> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", kind.table_name());
    conn.execute(&sql, [id])
}
