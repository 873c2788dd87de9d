//! Patient endpoint tests.
//!
//! Covers CRUD, OIB lookup and uniqueness, search, the details view and the
//! cascading delete.

mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use medsys_persistence::EntityStoreExt;
use medsys_persistence::models::{Examination, MedicalRecord, Prescription};
use serde_json::{Value, json};

use common::*;

// =============================================================================
// Create
// =============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_201_with_location() {
        let harness = TestHarness::new();

        let response = harness
            .server
            .post("/api/patients")
            .json(&patient_json("12345678901", "Ana", "Horvat"))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        let id = id_of(&body);
        assert_eq!(
            response.headers().get("location").unwrap(),
            &format!("{}/api/patients/{}", BASE_URL, id)
        );
        assert_eq!(body["oib"], "12345678901");
        assert_eq!(body["firstName"], "Ana");
        assert_eq!(body["gender"], "F");
        assert_eq!(body["dateOfBirth"], "1985-04-12");
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_oib_is_rejected() {
        let harness = TestHarness::new();
        harness.create_patient("12345678901", "Horvat").await;

        let response = harness
            .server
            .post("/api/patients")
            .json(&patient_json("12345678901", "Marko", "Kovač"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Patient with this OIB already exists");

        let all: Value = harness.server.get("/api/patients").await.json();
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oib_must_be_eleven_characters() {
        let harness = TestHarness::new();

        let response = harness
            .server
            .post("/api/patients")
            .json(&patient_json("1234", "Ana", "Horvat"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("oib"));
    }

    #[tokio::test]
    async fn test_unknown_gender_is_rejected() {
        let harness = TestHarness::new();
        let mut payload = patient_json("12345678901", "Ana", "Horvat");
        payload["gender"] = json!("X");

        let response = harness.server.post("/api/patients").json(&payload).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let harness = TestHarness::new();

        let response = harness
            .server
            .post("/api/patients")
            .bytes(Bytes::from_static(b"{\"oib\": "))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }
}

// =============================================================================
// Read
// =============================================================================

mod read {
    use super::*;

    #[tokio::test]
    async fn test_get_by_id() {
        let harness = TestHarness::new();
        let id = harness.create_patient("12345678901", "Horvat").await;

        let response = harness.server.get(&format!("/api/patients/{}", id)).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["lastName"], "Horvat");
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let harness = TestHarness::new();

        let response = harness.server.get("/api/patients/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"], "Patient not found");
    }

    #[tokio::test]
    async fn test_get_by_oib() {
        let harness = TestHarness::new();
        let id = harness.create_patient("98765432109", "Babić").await;

        let response = harness.server.get("/api/patients/oib/98765432109").await;

        response.assert_status_ok();
        assert_eq!(id_of(&response.json()), id);

        harness
            .server
            .get("/api/patients/oib/00000000000")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let harness = TestHarness::new();

        let response = harness.server.get("/api/patients").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!([]));
    }
}

// =============================================================================
// Search
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_matches_last_name_case_insensitively() {
        let harness = TestHarness::new();
        harness.create_patient("11111111111", "Horvat").await;
        harness.create_patient("22222222222", "Novak").await;
        harness.create_patient("33333333333", "Horvatić").await;

        let response = harness.server.get("/api/patients?search=horv").await;

        response.assert_status_ok();
        let body: Value = response.json();
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["lastName"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Horvat", "Horvatić"]);
    }

    #[tokio::test]
    async fn test_search_matches_oib_fragment() {
        let harness = TestHarness::new();
        harness.create_patient("11111111111", "Horvat").await;
        harness.create_patient("22222222222", "Novak").await;

        let body: Value = harness.server.get("/api/patients?search=2222").await.json();

        let patients = body.as_array().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0]["lastName"], "Novak");
    }

    #[tokio::test]
    async fn test_blank_search_lists_everyone() {
        let harness = TestHarness::new();
        harness.create_patient("11111111111", "Horvat").await;
        harness.create_patient("22222222222", "Novak").await;

        let body: Value = harness.server.get("/api/patients?search=%20").await.json();

        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_without_match_is_empty() {
        let harness = TestHarness::new();
        harness.create_patient("11111111111", "Horvat").await;

        let response = harness.server.get("/api/patients?search=zzz").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }
}

// =============================================================================
// Update
// =============================================================================

mod update {
    use super::*;

    #[tokio::test]
    async fn test_update_keeps_oib() {
        let harness = TestHarness::new();
        let id = harness.create_patient("12345678901", "Horvat").await;

        let response = harness
            .server
            .put(&format!("/api/patients/{}", id))
            .json(&json!({
                "oib": "99999999999",
                "firstName": "Ana",
                "lastName": "Horvat-Kovač",
                "dateOfBirth": "1985-04-13",
                "gender": "F"
            }))
            .await;

        response.assert_status(StatusCode::NO_CONTENT);

        let body: Value = harness
            .server
            .get(&format!("/api/patients/{}", id))
            .await
            .json();
        assert_eq!(body["lastName"], "Horvat-Kovač");
        assert_eq!(body["dateOfBirth"], "1985-04-13");
        assert_eq!(body["oib"], "12345678901");
    }

    #[tokio::test]
    async fn test_update_missing_is_404() {
        let harness = TestHarness::new();

        let response = harness
            .server
            .put("/api/patients/42")
            .json(&patient_json("12345678901", "Ana", "Horvat"))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

// =============================================================================
// Details and delete
// =============================================================================

mod details_and_delete {
    use super::*;

    #[tokio::test]
    async fn test_details_include_records_and_examinations() {
        let harness = TestHarness::new();
        let id = harness.create_patient("12345678901", "Horvat").await;
        harness.create_medical_record(id, "Asthma").await;
        let examination_id = harness.create_examination(id).await;
        harness.create_prescription(examination_id, "Ventolin").await;

        let response = harness
            .server
            .get(&format!("/api/patients/{}/details", id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["oib"], "12345678901");
        assert_eq!(body["medicalRecords"][0]["diseaseName"], "Asthma");
        assert_eq!(body["medicalRecords"][0]["patientOIB"], "12345678901");
        assert_eq!(body["examinations"][0]["examinationType"], "EKG");
        assert_eq!(
            body["examinations"][0]["prescriptions"][0]["medicationName"],
            "Ventolin"
        );
    }

    #[tokio::test]
    async fn test_details_missing_is_404() {
        let harness = TestHarness::new();

        harness
            .server
            .get("/api/patients/5/details")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_owned_entities() {
        let harness = TestHarness::new();
        let id = harness.create_patient("12345678901", "Horvat").await;
        let record_id = harness.create_medical_record(id, "Asthma").await;
        let examination_id = harness.create_examination(id).await;
        let prescription_id = harness.create_prescription(examination_id, "Ventolin").await;

        let response = harness.server.delete(&format!("/api/patients/{}", id)).await;
        response.assert_status(StatusCode::NO_CONTENT);

        harness
            .server
            .get(&format!("/api/patients/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let record: Option<MedicalRecord> = harness.backend.get_by_id(record_id).await.unwrap();
        let examination: Option<Examination> =
            harness.backend.get_by_id(examination_id).await.unwrap();
        let prescription: Option<Prescription> =
            harness.backend.get_by_id(prescription_id).await.unwrap();
        assert!(record.is_none());
        assert!(examination.is_none());
        assert!(prescription.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let harness = TestHarness::new();

        harness
            .server
            .delete("/api/patients/77")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
