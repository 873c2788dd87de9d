//! API route configuration.
//!
//! Defines all routes of the MedSys REST API.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use medsys_persistence::MedicalStore;

use crate::handlers;
use crate::state::AppState;

/// Path segments serving examination files. The second one is a misspelling
/// that published clients depend on.
const FILE_SEGMENTS: [&str; 2] = ["examinationfiles", "examiationfiles"];

/// Creates all REST API routes.
///
/// # Routes
///
/// ## Health
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Patients
/// - `GET /api/patients` - List (`?search=`)
/// - `POST /api/patients` - Create
/// - `GET /api/patients/oib/{oib}` - Lookup by OIB
/// - `GET|PUT|DELETE /api/patients/{patient_id}` - Read, update, delete
/// - `GET /api/patients/{patient_id}/details` - Patient with records and examinations
///
/// ## Medical records and examinations
/// - `GET|POST /api/patients/{patient_id}/medicalrecords`
/// - `GET|PUT|DELETE /api/patients/{patient_id}/medicalrecords/{id}`
/// - `GET|POST /api/patients/{patient_id}/examinations`
/// - `GET|PUT|DELETE /api/patients/{patient_id}/examinations/{id}`
///
/// ## Prescriptions and files
/// - `GET|POST /api/examinations/{examination_id}/prescriptions`
/// - `PUT|DELETE /api/examinations/{examination_id}/prescriptions/{id}`
/// - `GET /api/examinations/{examination_id}/examinationfiles`
/// - `POST /api/examinations/{examination_id}/examinationfiles/upload`
/// - `GET /api/examinations/{examination_id}/examinationfiles/{file_id}/download`
/// - `DELETE /api/examinations/{examination_id}/examinationfiles/{file_id}`
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: MedicalStore + 'static,
{
    Router::new()
        // Health routes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .nest("/api", api_routes::<S>())
        .with_state(state)
}

fn api_routes<S>() -> Router<AppState<S>>
where
    S: MedicalStore + 'static,
{
    let router = Router::new()
        // Patients
        .route(
            "/patients",
            get(handlers::list_patients_handler::<S>).post(handlers::create_patient_handler::<S>),
        )
        .route(
            "/patients/oib/{oib}",
            get(handlers::get_patient_by_oib_handler::<S>),
        )
        .route(
            "/patients/{patient_id}",
            get(handlers::get_patient_handler::<S>)
                .put(handlers::update_patient_handler::<S>)
                .delete(handlers::delete_patient_handler::<S>),
        )
        .route(
            "/patients/{patient_id}/details",
            get(handlers::get_patient_details_handler::<S>),
        )
        // Medical records
        .route(
            "/patients/{patient_id}/medicalrecords",
            get(handlers::list_medical_records_handler::<S>)
                .post(handlers::create_medical_record_handler::<S>),
        )
        .route(
            "/patients/{patient_id}/medicalrecords/{id}",
            get(handlers::get_medical_record_handler::<S>)
                .put(handlers::update_medical_record_handler::<S>)
                .delete(handlers::delete_medical_record_handler::<S>),
        )
        // Examinations
        .route(
            "/patients/{patient_id}/examinations",
            get(handlers::list_examinations_handler::<S>)
                .post(handlers::create_examination_handler::<S>),
        )
        .route(
            "/patients/{patient_id}/examinations/{id}",
            get(handlers::get_examination_handler::<S>)
                .put(handlers::update_examination_handler::<S>)
                .delete(handlers::delete_examination_handler::<S>),
        )
        // Prescriptions
        .route(
            "/examinations/{examination_id}/prescriptions",
            get(handlers::list_prescriptions_handler::<S>)
                .post(handlers::create_prescription_handler::<S>),
        )
        .route(
            "/examinations/{examination_id}/prescriptions/{id}",
            put(handlers::update_prescription_handler::<S>)
                .delete(handlers::delete_prescription_handler::<S>),
        );

    // Examination files
    FILE_SEGMENTS.iter().fold(router, |router, segment| {
        router
            .route(
                &format!("/examinations/{{examination_id}}/{}", segment),
                get(handlers::list_files_handler::<S>),
            )
            .route(
                &format!("/examinations/{{examination_id}}/{}/upload", segment),
                post(handlers::upload_file_handler::<S>),
            )
            .route(
                &format!(
                    "/examinations/{{examination_id}}/{}/{{file_id}}/download",
                    segment
                ),
                get(handlers::download_file_handler::<S>),
            )
            .route(
                &format!("/examinations/{{examination_id}}/{}/{{file_id}}", segment),
                delete(handlers::delete_file_handler::<S>),
            )
    })
}
