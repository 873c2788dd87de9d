//! PostgreSQL backend integration tests.
//!
//! Configuration tests always run. Tests that need a live server read its
//! connection string from `MEDSYS_TEST_POSTGRES_URL` and are skipped when it
//! is unset.
//!
//! Run with: `cargo test -p medsys-persistence --features postgres -- postgres`

#![cfg(feature = "postgres")]

use chrono::NaiveDate;

use medsys_persistence::backends::postgres::{PostgresBackend, PostgresConfig, PostgresSslMode};
use medsys_persistence::core::{
    EntityStore, EntityStoreExt, ExaminationStore, PatientStore, UnitOfWork,
};
use medsys_persistence::error::{ConstraintError, StorageError};
use medsys_persistence::models::{
    Examination, ExaminationType, Gender, NewExamination, NewPatient, Patient,
};

// ============================================================================
// Backend Configuration Tests (no PostgreSQL instance required)
// ============================================================================

#[test]
fn test_postgres_config_defaults() {
    let config = PostgresConfig::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
    assert_eq!(config.dbname, "medsys");
    assert_eq!(config.user, "medsys");
    assert!(config.password.is_none());
    assert_eq!(config.ssl_mode, PostgresSslMode::Prefer);
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.connect_timeout_secs, 5);
    assert_eq!(config.statement_timeout_ms, 30000);
}

#[test]
fn test_postgres_config_serialization() {
    let config = PostgresConfig {
        host: "pg-server".to_string(),
        port: 5433,
        dbname: "records".to_string(),
        user: "clinic".to_string(),
        password: Some("secret".to_string()),
        ssl_mode: PostgresSslMode::Require,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: PostgresConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.host, "pg-server");
    assert_eq!(deserialized.port, 5433);
    assert_eq!(deserialized.dbname, "records");
    assert_eq!(deserialized.user, "clinic");
    assert_eq!(deserialized.password, Some("secret".to_string()));
    assert_eq!(deserialized.ssl_mode, PostgresSslMode::Require);
}

#[test]
fn test_postgres_config_partial_json_uses_defaults() {
    let config: PostgresConfig = serde_json::from_str(r#"{"host":"db"}"#).unwrap();
    assert_eq!(config.host, "db");
    assert_eq!(config.port, 5432);
    assert_eq!(config.dbname, "medsys");
}

#[tokio::test]
async fn test_rejects_non_postgres_connection_string() {
    let err = PostgresBackend::from_connection_string("mysql://localhost/medsys")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Backend(_)));
}

// ============================================================================
// Live Tests (require MEDSYS_TEST_POSTGRES_URL)
// ============================================================================

async fn live_backend() -> Option<PostgresBackend> {
    let url = std::env::var("MEDSYS_TEST_POSTGRES_URL").ok()?;
    let backend = PostgresBackend::from_connection_string(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    backend.init_schema().await.expect("Failed to initialize schema");
    Some(backend)
}

/// OIBs must be unique across runs against a shared database.
fn unique_oib() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{:011}", nanos % 100_000_000_000)
}

fn new_patient(oib: &str) -> NewPatient {
    NewPatient {
        oib: oib.to_string(),
        first_name: "Ivan".to_string(),
        last_name: "Kovačević".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1978, 11, 2).unwrap(),
        gender: Gender::Male,
    }
}

#[tokio::test]
async fn test_postgres_health_check() {
    let Some(backend) = live_backend().await else {
        return;
    };
    assert_eq!(backend.backend_name(), "postgres");
    backend.health_check().await.unwrap();
}

#[tokio::test]
async fn test_postgres_patient_crud_and_oib_uniqueness() {
    let Some(backend) = live_backend().await else {
        return;
    };
    let oib = unique_oib();

    let patient = backend.insert::<Patient>(new_patient(&oib)).await.unwrap();
    let by_oib = backend.get_by_oib(&oib).await.unwrap().unwrap();
    assert_eq!(by_oib.id, patient.id);

    let err = backend
        .insert::<Patient>(new_patient(&oib))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Constraint(ConstraintError::UniqueViolation { .. })
    ));

    let mut work = UnitOfWork::new();
    work.delete::<Patient>(patient.id);
    backend.save(work).await.unwrap();
    assert!(backend.get_by_oib(&oib).await.unwrap().is_none());
}

#[tokio::test]
async fn test_postgres_patient_delete_cascades() {
    let Some(backend) = live_backend().await else {
        return;
    };

    let patient = backend
        .insert::<Patient>(new_patient(&unique_oib()))
        .await
        .unwrap();
    let examination = backend
        .insert::<Examination>(NewExamination {
            patient_id: patient.id,
            examination_type: ExaminationType::Ct,
            examination_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            notes: None,
        })
        .await
        .unwrap();

    let mut work = UnitOfWork::new();
    work.delete::<Patient>(patient.id);
    backend.save(work).await.unwrap();

    let gone: Option<Examination> = backend.get_by_id(examination.id).await.unwrap();
    assert!(gone.is_none());
    assert!(
        backend
            .get_examinations_by_patient_id(patient.id)
            .await
            .unwrap()
            .is_empty()
    );
}
