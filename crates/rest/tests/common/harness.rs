//! REST API test harness.
//!
//! Provides a test server backed by in-memory SQLite and an in-memory blob
//! store, plus helpers that create entities over HTTP.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use medsys_persistence::backends::sqlite::SqliteBackend;
use medsys_persistence::blob::InMemoryBlobStore;
use medsys_persistence::models::EntityId;
use serde_json::Value;

use medsys_rest::{AppState, ServerConfig};

use super::fixtures;

/// Base URL configured for every test server.
pub const BASE_URL: &str = "http://localhost:8080";

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = TestHarness::new();
/// let patient_id = harness.create_patient("12345678901", "Horvat").await;
/// harness.server.get(&format!("/api/patients/{}", patient_id)).await.assert_status_ok();
/// ```
pub struct TestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The entity store.
    pub backend: Arc<SqliteBackend>,

    /// The blob store.
    pub blobs: Arc<InMemoryBlobStore>,
}

impl TestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");
        let backend = Arc::new(backend);
        let blobs = Arc::new(InMemoryBlobStore::new());

        let state = AppState::new(Arc::clone(&backend), blobs.clone(), config);
        let app = medsys_rest::routing::create_routes(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            blobs,
        }
    }

    /// Creates a patient and returns its id.
    pub async fn create_patient(&self, oib: &str, last_name: &str) -> EntityId {
        let response = self
            .server
            .post("/api/patients")
            .json(&fixtures::patient_json(oib, "Ana", last_name))
            .await;
        response.assert_status(StatusCode::CREATED);
        id_of(&response.json())
    }

    /// Creates a medical record and returns its id.
    pub async fn create_medical_record(&self, patient_id: EntityId, disease: &str) -> EntityId {
        let response = self
            .server
            .post(&format!("/api/patients/{}/medicalrecords", patient_id))
            .json(&fixtures::medical_record_json(disease))
            .await;
        response.assert_status(StatusCode::CREATED);
        id_of(&response.json())
    }

    /// Creates an examination and returns its id.
    pub async fn create_examination(&self, patient_id: EntityId) -> EntityId {
        let response = self
            .server
            .post(&format!("/api/patients/{}/examinations", patient_id))
            .json(&fixtures::examination_json("EKG"))
            .await;
        response.assert_status(StatusCode::CREATED);
        id_of(&response.json())
    }

    /// Creates a prescription and returns its id.
    pub async fn create_prescription(&self, examination_id: EntityId, medication: &str) -> EntityId {
        let response = self
            .server
            .post(&format!("/api/examinations/{}/prescriptions", examination_id))
            .json(&fixtures::prescription_json(medication))
            .await;
        response.assert_status(StatusCode::CREATED);
        id_of(&response.json())
    }

    /// Uploads `bytes` as `file_name` and returns the response body.
    pub async fn upload_file(
        &self,
        examination_id: EntityId,
        file_name: &str,
        bytes: &[u8],
    ) -> Value {
        let response = self
            .server
            .post(&format!(
                "/api/examinations/{}/examinationfiles/upload",
                examination_id
            ))
            .multipart(file_form(file_name, bytes))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

/// A multipart form with a `file` part.
pub fn file_form(file_name: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_type("application/pdf"),
    )
}

/// Reads the numeric `id` of a JSON body.
pub fn id_of(body: &Value) -> EntityId {
    body["id"].as_i64().expect("response has no numeric id")
}
