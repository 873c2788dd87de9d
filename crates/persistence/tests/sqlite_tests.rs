//! SQLite backend integration tests.
//!
//! These tests exercise the entity store through its public traits against an
//! in-memory database.

use chrono::NaiveDate;

use medsys_persistence::backends::sqlite::SqliteBackend;
use medsys_persistence::core::{
    EntityStore, EntityStoreExt, ExaminationFileStore, ExaminationStore, MedicalRecordStore,
    PatientStore, PrescriptionStore, UnitOfWork,
};
use medsys_persistence::error::{ConstraintError, StorageError};
use medsys_persistence::models::{
    EntityKind, Examination, ExaminationFile, ExaminationType, Gender, MedicalRecord,
    NewExamination, NewExaminationFile, NewMedicalRecord, NewPatient, NewPrescription, Patient,
    Prescription,
};

fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_patient(oib: &str, last_name: &str) -> NewPatient {
    NewPatient {
        oib: oib.to_string(),
        first_name: "Ana".to_string(),
        last_name: last_name.to_string(),
        date_of_birth: date(1990, 5, 17),
        gender: Gender::Female,
    }
}

fn new_examination(patient_id: i64) -> NewExamination {
    NewExamination {
        patient_id,
        examination_type: ExaminationType::XRay,
        examination_date: date(2024, 3, 1),
        notes: Some("Chest".to_string()),
    }
}

fn new_prescription(examination_id: i64, name: &str) -> NewPrescription {
    NewPrescription {
        examination_id,
        medication_name: name.to_string(),
        dosage: Some("500mg".to_string()),
        instructions: None,
        prescription_date: date(2024, 3, 1),
    }
}

fn new_file(examination_id: i64, name: &str) -> NewExaminationFile {
    NewExaminationFile {
        examination_id,
        file_name: name.to_string(),
        file_path: format!("examination-{}/uuid_{}", examination_id, name),
        file_size: 42,
    }
}

/// Creates a patient with one medical record and one examination holding a
/// prescription and a file.
async fn seed(backend: &SqliteBackend) -> (Patient, Examination) {
    let patient = backend
        .insert::<Patient>(new_patient("12345678901", "Horvat"))
        .await
        .unwrap();
    backend
        .insert::<MedicalRecord>(NewMedicalRecord {
            patient_id: patient.id,
            disease_name: "Asthma".to_string(),
            start_date: date(2020, 1, 1),
            end_date: None,
            description: None,
        })
        .await
        .unwrap();
    let examination = backend
        .insert::<Examination>(new_examination(patient.id))
        .await
        .unwrap();
    backend
        .insert::<Prescription>(new_prescription(examination.id, "Ventolin"))
        .await
        .unwrap();
    backend
        .insert::<ExaminationFile>(new_file(examination.id, "xray.png"))
        .await
        .unwrap();
    (patient, examination)
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_insert_and_get_by_id() {
    let backend = create_backend();

    let created = backend
        .insert::<Patient>(new_patient("12345678901", "Horvat"))
        .await
        .unwrap();
    assert!(created.id > 0);

    let read: Patient = backend.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(read, created);
    assert_eq!(read.gender, Gender::Female);
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let backend = create_backend();
    let missing: Option<Examination> = backend.get_by_id(999).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_get_all_ordered_by_id() {
    let backend = create_backend();
    for (i, name) in ["Zorić", "Anić", "Babić"].iter().enumerate() {
        backend
            .insert::<Patient>(new_patient(&format!("0000000000{}", i), name))
            .await
            .unwrap();
    }

    let patients: Vec<Patient> = backend.get_all().await.unwrap();
    let ids: Vec<_> = patients.iter().map(|p| p.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(patients.len(), 3);
}

#[tokio::test]
async fn test_update_changes_mutable_fields_only() {
    let backend = create_backend();
    let mut patient = backend
        .insert::<Patient>(new_patient("12345678901", "Horvat"))
        .await
        .unwrap();

    patient.first_name = "Marta".to_string();
    patient.oib = "99999999999".to_string();
    let mut work = UnitOfWork::new();
    work.update(patient.clone());
    let receipt = backend.save(work).await.unwrap();
    assert_eq!(receipt.updated, 1);

    let read: Patient = backend.get_by_id(patient.id).await.unwrap().unwrap();
    assert_eq!(read.first_name, "Marta");
    assert_eq!(read.oib, "12345678901");
}

#[tokio::test]
async fn test_update_missing_row_is_stale() {
    let backend = create_backend();
    let (_, mut examination) = seed(&backend).await;

    let mut work = UnitOfWork::new();
    work.delete::<Examination>(examination.id);
    backend.save(work).await.unwrap();

    examination.notes = None;
    let mut work = UnitOfWork::new();
    work.update(examination.clone());
    let err = backend.save(work).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Constraint(ConstraintError::StaleEntity {
            kind: EntityKind::Examination,
            ..
        })
    ));
}

#[tokio::test]
async fn test_delete_missing_row_is_stale() {
    let backend = create_backend();
    let mut work = UnitOfWork::new();
    work.delete::<Prescription>(12);
    assert!(backend.save(work).await.is_err());
}

// ============================================================================
// Unit of Work Tests
// ============================================================================

#[tokio::test]
async fn test_unit_of_work_commits_all_changes() {
    let backend = create_backend();
    let (_, examination) = seed(&backend).await;

    let mut work = UnitOfWork::new();
    work.add(new_prescription(examination.id, "Aspirin"))
        .add(new_prescription(examination.id, "Ibuprofen"));
    let receipt = backend.save(work).await.unwrap();

    assert_eq!(receipt.inserted.len(), 2);
    assert!(receipt.inserted[0].1 < receipt.inserted[1].1);

    let prescriptions = backend
        .get_prescriptions_by_examination_id(examination.id)
        .await
        .unwrap();
    assert_eq!(prescriptions.len(), 3);
}

#[tokio::test]
async fn test_unit_of_work_rolls_back_on_failure() {
    let backend = create_backend();
    let (_, examination) = seed(&backend).await;

    let mut work = UnitOfWork::new();
    work.add(new_prescription(examination.id, "Aspirin"))
        .delete::<Prescription>(9_999);

    assert!(backend.save(work).await.is_err());

    let prescriptions = backend
        .get_prescriptions_by_examination_id(examination.id)
        .await
        .unwrap();
    assert_eq!(prescriptions.len(), 1);
    assert_eq!(prescriptions[0].medication_name, "Ventolin");
}

#[tokio::test]
async fn test_unique_oib_enforced_by_store() {
    let backend = create_backend();
    backend
        .insert::<Patient>(new_patient("12345678901", "Horvat"))
        .await
        .unwrap();

    let err = backend
        .insert::<Patient>(new_patient("12345678901", "Kovač"))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    let patients: Vec<Patient> = backend.get_all().await.unwrap();
    assert_eq!(patients.len(), 1);
}

// ============================================================================
// Cascade Tests
// ============================================================================

#[tokio::test]
async fn test_patient_delete_cascades() {
    let backend = create_backend();
    let (patient, examination) = seed(&backend).await;

    let mut work = UnitOfWork::new();
    work.delete::<Patient>(patient.id);
    backend.save(work).await.unwrap();

    assert!(backend.get_all::<MedicalRecord>().await.unwrap().is_empty());
    assert!(backend.get_all::<Examination>().await.unwrap().is_empty());
    assert!(
        backend
            .get_prescriptions_by_examination_id(examination.id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        backend
            .get_files_by_examination_id(examination.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_examination_delete_cascades_to_children_only() {
    let backend = create_backend();
    let (patient, examination) = seed(&backend).await;

    let mut work = UnitOfWork::new();
    work.delete::<Examination>(examination.id);
    backend.save(work).await.unwrap();

    assert!(backend.get_all::<Prescription>().await.unwrap().is_empty());
    assert!(backend.get_all::<ExaminationFile>().await.unwrap().is_empty());
    assert_eq!(
        backend
            .get_records_by_patient_id(patient.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

// ============================================================================
// Query Tests
// ============================================================================

#[tokio::test]
async fn test_get_by_oib() {
    let backend = create_backend();
    let (patient, _) = seed(&backend).await;

    let found = backend.get_by_oib("12345678901").await.unwrap().unwrap();
    assert_eq!(found.id, patient.id);
    assert!(backend.get_by_oib("00000000000").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_matches_last_name_or_oib_case_insensitively() {
    let backend = create_backend();
    backend
        .insert::<Patient>(new_patient("11111111111", "Horvat"))
        .await
        .unwrap();
    backend
        .insert::<Patient>(new_patient("22222222222", "Kovačević"))
        .await
        .unwrap();
    backend
        .insert::<Patient>(new_patient("33333222222", "Babić"))
        .await
        .unwrap();

    let by_name = backend.search("horv").await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].last_name, "Horvat");

    let by_oib = backend.search("22222").await.unwrap();
    let names: Vec<_> = by_oib.iter().map(|p| p.last_name.as_str()).collect();
    assert_eq!(names, vec!["Kovačević", "Babić"]);

    assert!(backend.search("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_patient_details() {
    let backend = create_backend();
    let (patient, examination) = seed(&backend).await;

    let details = backend
        .get_patient_with_details(patient.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(details.patient, patient);
    assert_eq!(details.medical_records.len(), 1);
    assert_eq!(details.examinations.len(), 1);

    let exam = &details.examinations[0];
    assert_eq!(exam.examination.id, examination.id);
    assert_eq!(exam.prescriptions.len(), 1);
    assert_eq!(exam.files.len(), 1);
    assert_eq!(exam.files[0].file_name, "xray.png");

    assert!(backend.get_patient_with_details(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_examination_details() {
    let backend = create_backend();
    let (patient, examination) = seed(&backend).await;

    let details = backend
        .get_examination_with_details(examination.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(details.patient.id, patient.id);
    assert_eq!(details.examination.examination_type, ExaminationType::XRay);
    assert_eq!(details.prescriptions[0].medication_name, "Ventolin");
    assert_eq!(details.files[0].file_size, 42);
}

#[tokio::test]
async fn test_examinations_by_patient_keep_children_separate() {
    let backend = create_backend();
    let (patient, first) = seed(&backend).await;
    let second = backend
        .insert::<Examination>(new_examination(patient.id))
        .await
        .unwrap();
    backend
        .insert::<Prescription>(new_prescription(second.id, "Paracetamol"))
        .await
        .unwrap();

    let exams = backend
        .get_examinations_by_patient_id(patient.id)
        .await
        .unwrap();
    assert_eq!(exams.len(), 2);
    assert_eq!(exams[0].examination.id, first.id);
    assert_eq!(exams[0].prescriptions[0].medication_name, "Ventolin");
    assert_eq!(exams[1].prescriptions[0].medication_name, "Paracetamol");
    assert!(exams[1].files.is_empty());

    assert!(
        backend
            .get_examinations_by_patient_id(404)
            .await
            .unwrap()
            .is_empty()
    );
}

// ============================================================================
// File Backend Tests
// ============================================================================

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medsys.db");

    {
        let backend = SqliteBackend::open(&path).unwrap();
        backend.init_schema().unwrap();
        seed(&backend).await;
    }

    let backend = SqliteBackend::open(&path).unwrap();
    backend.init_schema().unwrap();
    let patient = backend.get_by_oib("12345678901").await.unwrap().unwrap();
    let details = backend
        .get_patient_with_details(patient.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(details.examinations.len(), 1);
    assert!(backend.health_check().await.is_ok());
}
