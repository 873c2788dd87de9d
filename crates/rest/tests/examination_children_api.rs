//! Prescription and examination file endpoint tests.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use medsys_persistence::EntityStoreExt;
use medsys_persistence::blob::BlobStore;
use medsys_persistence::models::ExaminationFile;
use serde_json::{Value, json};

use common::*;

/// Creates a patient with one examination and returns the examination id.
async fn examination(harness: &TestHarness) -> i64 {
    let patient_id = harness.create_patient("12345678901", "Horvat").await;
    harness.create_examination(patient_id).await
}

// =============================================================================
// Prescriptions
// =============================================================================

mod prescriptions {
    use super::*;

    #[tokio::test]
    async fn test_create_points_location_at_list() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let response = harness
            .server
            .post(&format!("/api/examinations/{}/prescriptions", examination_id))
            .json(&prescription_json("Ibuprofen"))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(
            response.headers().get("location").unwrap(),
            &format!("{}/api/examinations/{}/prescriptions", BASE_URL, examination_id)
        );
        let body: Value = response.json();
        assert_eq!(body["examinationId"], examination_id);
        assert_eq!(body["dosage"], "400mg");
    }

    #[tokio::test]
    async fn test_list_for_missing_examination_is_404() {
        let harness = TestHarness::new();

        let response = harness.server.get("/api/examinations/31/prescriptions").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Examination not found");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        let id = harness.create_prescription(examination_id, "Ibuprofen").await;
        let path = format!("/api/examinations/{}/prescriptions/{}", examination_id, id);

        harness
            .server
            .put(&path)
            .json(&json!({
                "medicationName": "Paracetamol",
                "dosage": "500mg",
                "prescriptionDate": "2024-02-21"
            }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let list: Value = harness
            .server
            .get(&format!("/api/examinations/{}/prescriptions", examination_id))
            .await
            .json();
        assert_eq!(list[0]["medicationName"], "Paracetamol");
        assert!(list[0]["instructions"].is_null());

        harness
            .server
            .delete(&path)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let list: Value = harness
            .server
            .get(&format!("/api/examinations/{}/prescriptions", examination_id))
            .await
            .json();
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_prescription_of_other_examination_is_404() {
        let harness = TestHarness::new();
        let patient_id = harness.create_patient("12345678901", "Horvat").await;
        let owner = harness.create_examination(patient_id).await;
        let other = harness.create_examination(patient_id).await;
        let id = harness.create_prescription(owner, "Ibuprofen").await;

        let path = format!("/api/examinations/{}/prescriptions/{}", other, id);

        let response = harness
            .server
            .put(&path)
            .json(&prescription_json("Changed"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Prescription not found");

        harness
            .server
            .delete(&path)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_medication_name_too_long() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let response = harness
            .server
            .post(&format!("/api/examinations/{}/prescriptions", examination_id))
            .json(&json!({
                "medicationName": "x".repeat(201),
                "prescriptionDate": "2024-02-20"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "medicationName must be at most 200 characters"
        );
    }
}

// =============================================================================
// Upload
// =============================================================================

mod upload {
    use super::*;

    #[tokio::test]
    async fn test_upload_stores_blob_and_metadata() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let body = harness
            .upload_file(examination_id, "nalaz.pdf", b"%PDF-1.7 report")
            .await;

        let id = id_of(&body);
        assert_eq!(body["fileName"], "nalaz.pdf");
        assert_eq!(body["fileSize"], 15);
        assert_eq!(
            body["downloadUrl"],
            format!(
                "{}/api/examinations/{}/examinationfiles/{}/download",
                BASE_URL, examination_id, id
            )
        );

        let path = body["filePath"].as_str().unwrap();
        assert!(path.starts_with(&format!("examination-{}/", examination_id)));
        assert!(path.ends_with("_nalaz.pdf"));
        assert!(harness.blobs.contains(path));
    }

    #[tokio::test]
    async fn test_upload_with_description_part() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let form = file_form("ecg.pdf", b"trace").add_text("description", "Resting ECG");
        let response = harness
            .server
            .post(&format!(
                "/api/examinations/{}/examinationfiles/upload",
                examination_id
            ))
            .multipart(form)
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_upload_strips_client_directories() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let body = harness
            .upload_file(examination_id, "scans/2024/lung.png", b"png")
            .await;

        assert_eq!(body["fileName"], "lung.png");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_400() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let form = MultipartForm::new().add_text("description", "no file");
        let response = harness
            .server
            .post(&format!(
                "/api/examinations/{}/examinationfiles/upload",
                examination_id
            ))
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "No file provided");
        assert!(harness.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_400() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(Vec::new()).file_name("empty.pdf"));
        let response = harness
            .server
            .post(&format!(
                "/api/examinations/{}/examinationfiles/upload",
                examination_id
            ))
            .multipart(form)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_to_missing_examination_is_404() {
        let harness = TestHarness::new();

        let response = harness
            .server
            .post("/api/examinations/8/examinationfiles/upload")
            .multipart(file_form("a.pdf", b"abc"))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(harness.blobs.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_reports_details() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        harness.blobs.set_refuse_uploads(true);

        let response = harness
            .server
            .post(&format!(
                "/api/examinations/{}/examinationfiles/upload",
                examination_id
            ))
            .multipart(file_form("a.pdf", b"abc"))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Error uploading file");
        assert!(body["details"].is_string());

        let files: Value = harness
            .server
            .get(&format!("/api/examinations/{}/examinationfiles", examination_id))
            .await
            .json();
        assert_eq!(files, json!([]));
    }
}

// =============================================================================
// Download, list and delete
// =============================================================================

mod download_and_delete {
    use super::*;

    #[tokio::test]
    async fn test_download_returns_attachment() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        let body = harness
            .upload_file(examination_id, "nalaz.pdf", b"%PDF-1.7 report")
            .await;
        let id = id_of(&body);

        let response = harness
            .server
            .get(&format!(
                "/api/examinations/{}/examinationfiles/{}/download",
                examination_id, id
            ))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/octet-stream"
        );
        let disposition = response
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"nalaz.pdf\""));
        assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.7 report");
    }

    #[tokio::test]
    async fn test_misspelled_alias_is_served() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        harness.upload_file(examination_id, "a.pdf", b"abc").await;

        let response = harness
            .server
            .get(&format!("/api/examinations/{}/examiationfiles", examination_id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_of_other_examination_is_404() {
        let harness = TestHarness::new();
        let patient_id = harness.create_patient("12345678901", "Horvat").await;
        let owner = harness.create_examination(patient_id).await;
        let other = harness.create_examination(patient_id).await;
        let id = id_of(&harness.upload_file(owner, "a.pdf", b"abc").await);

        let response = harness
            .server
            .get(&format!(
                "/api/examinations/{}/examinationfiles/{}/download",
                other, id
            ))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "File not found");
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_metadata() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        let body = harness.upload_file(examination_id, "a.pdf", b"abc").await;
        let id = id_of(&body);
        let path = body["filePath"].as_str().unwrap().to_string();

        harness
            .server
            .delete(&format!(
                "/api/examinations/{}/examinationfiles/{}",
                examination_id, id
            ))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(!harness.blobs.contains(&path));
        let row: Option<ExaminationFile> = harness.backend.get_by_id(id).await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_failed_blob_delete_keeps_metadata() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        let body = harness.upload_file(examination_id, "a.pdf", b"abc").await;
        let id = id_of(&body);
        harness.blobs.set_refuse_deletes(true);

        let response = harness
            .server
            .delete(&format!(
                "/api/examinations/{}/examinationfiles/{}",
                examination_id, id
            ))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<Value>()["error"],
            "Error deleting file from storage"
        );
        let row: Option<ExaminationFile> = harness.backend.get_by_id(id).await.unwrap();
        assert!(row.is_some());
    }

    #[tokio::test]
    async fn test_download_of_vanished_blob_is_500() {
        let harness = TestHarness::new();
        let examination_id = examination(&harness).await;
        let body = harness.upload_file(examination_id, "a.pdf", b"abc").await;
        let id = id_of(&body);

        assert!(harness.blobs.delete(body["filePath"].as_str().unwrap()).await);

        let response = harness
            .server
            .get(&format!(
                "/api/examinations/{}/examinationfiles/{}/download",
                examination_id, id
            ))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.json::<Value>()["error"], "Error downloading file");
    }
}
