//! PostgreSQL schema definitions and migrations.

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

fn pg_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}

/// Initialize the database schema.
pub async fn initialize_schema(client: &deadpool_postgres::Client) -> StorageResult<()> {
    let current_version = get_schema_version(client).await?;

    if current_version == 0 {
        create_schema_v1(client).await?;
        set_schema_version(client, SCHEMA_VERSION).await?;
        tracing::info!(version = SCHEMA_VERSION, "Created PostgreSQL schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(pg_error(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get the current schema version.
async fn get_schema_version(client: &deadpool_postgres::Client) -> StorageResult<i32> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            )",
            &[],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create schema_version table: {}", e)))?;

    let row = client
        .query_opt("SELECT version FROM schema_version LIMIT 1", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to query schema version: {}", e)))?;

    Ok(row.map(|r| r.get::<_, i32>(0)).unwrap_or(0))
}

/// Set the schema version.
async fn set_schema_version(client: &deadpool_postgres::Client, version: i32) -> StorageResult<()> {
    client
        .execute("DELETE FROM schema_version", &[])
        .await
        .map_err(|e| pg_error(format!("Failed to clear schema_version: {}", e)))?;

    client
        .execute(
            "INSERT INTO schema_version (version) VALUES ($1)",
            &[&version],
        )
        .await
        .map_err(|e| pg_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1).
async fn create_schema_v1(client: &deadpool_postgres::Client) -> StorageResult<()> {
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS patients (
                id BIGSERIAL PRIMARY KEY,
                oib VARCHAR(11) NOT NULL,
                first_name VARCHAR(100) NOT NULL,
                last_name VARCHAR(100) NOT NULL,
                date_of_birth DATE NOT NULL,
                gender CHAR(1) NOT NULL CHECK (gender IN ('M', 'F', 'O')),
                created_at TIMESTAMPTZ NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_patients_oib ON patients(oib);

            CREATE TABLE IF NOT EXISTS medical_records (
                id BIGSERIAL PRIMARY KEY,
                patient_id BIGINT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
                disease_name VARCHAR(200) NOT NULL,
                start_date DATE NOT NULL,
                end_date DATE,
                description TEXT,
                created_at TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_medical_records_patient ON medical_records(patient_id);

            CREATE TABLE IF NOT EXISTS examinations (
                id BIGSERIAL PRIMARY KEY,
                patient_id BIGINT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
                examination_type VARCHAR(10) NOT NULL,
                examination_date DATE NOT NULL,
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_examinations_patient ON examinations(patient_id);

            CREATE TABLE IF NOT EXISTS prescriptions (
                id BIGSERIAL PRIMARY KEY,
                examination_id BIGINT NOT NULL REFERENCES examinations(id) ON DELETE CASCADE,
                medication_name VARCHAR(200) NOT NULL,
                dosage VARCHAR(100),
                instructions TEXT,
                prescription_date DATE NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_prescriptions_examination ON prescriptions(examination_id);

            CREATE TABLE IF NOT EXISTS examination_files (
                id BIGSERIAL PRIMARY KEY,
                examination_id BIGINT NOT NULL REFERENCES examinations(id) ON DELETE CASCADE,
                file_name VARCHAR(255) NOT NULL,
                file_path VARCHAR(500) NOT NULL,
                file_size BIGINT NOT NULL,
                upload_date TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_examination_files_examination ON examination_files(examination_id);",
        )
        .await
        .map_err(|e| pg_error(format!("Failed to create tables: {}", e)))
}
