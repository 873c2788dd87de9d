//! Patient handlers.
//!
//! `[base]/api/patients`

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medsys_persistence::MedicalStore;
use medsys_persistence::models::EntityId;
use serde::Deserialize;
use tracing::debug;

use crate::dto::{CreatePatientRequest, UpdatePatientRequest};
use crate::error::RestResult;
use crate::extractors::ValidatedJson;
use crate::responses;
use crate::state::AppState;

/// Query parameters of the patient list.
#[derive(Debug, Default, Deserialize)]
pub struct PatientListQuery {
    /// Case-insensitive term matched against first name, last name and OIB.
    pub search: Option<String>,
}

/// Lists all patients, or those matching `search`.
///
/// # HTTP Request
///
/// `GET [base]/api/patients?search=[term]`
///
/// # Response
///
/// - `200 OK` - JSON array of patients (empty when nothing matches)
pub async fn list_patients_handler<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<PatientListQuery>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(search = ?query.search, "Processing patient list request");

    let patients = state.patients().list(query.search.as_deref()).await?;
    Ok(Json(patients).into_response())
}

/// Reads a patient by ID.
///
/// # HTTP Request
///
/// `GET [base]/api/patients/[id]`
///
/// # Response
///
/// - `200 OK` - The patient
/// - `404 Not Found` - No such patient
pub async fn get_patient_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(id, "Processing patient read request");

    let patient = state.patients().get(id).await?;
    Ok(Json(patient).into_response())
}

/// Reads a patient by OIB.
///
/// # HTTP Request
///
/// `GET [base]/api/patients/oib/[oib]`
pub async fn get_patient_by_oib_handler<S>(
    State(state): State<AppState<S>>,
    Path(oib): Path<String>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(oib = %oib, "Processing patient lookup by OIB");

    let patient = state.patients().get_by_oib(&oib).await?;
    Ok(Json(patient).into_response())
}

/// Reads a patient with medical records and examinations.
///
/// # HTTP Request
///
/// `GET [base]/api/patients/[id]/details`
///
/// # Response
///
/// - `200 OK` - The patient with `medicalRecords` and `examinations`
/// - `404 Not Found` - No such patient
pub async fn get_patient_details_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(id, "Processing patient details request");

    let details = state.patients().get_details(id).await?;
    Ok(Json(details).into_response())
}

/// Registers a new patient.
///
/// # HTTP Request
///
/// `POST [base]/api/patients`
///
/// # Response
///
/// - `201 Created` - Patient created, `Location` points at it
/// - `400 Bad Request` - Invalid payload, or the OIB is already registered
///
/// # Example
///
/// ```http
/// POST /api/patients HTTP/1.1
/// Content-Type: application/json
///
/// {"oib":"12345678901","firstName":"Ana","lastName":"Horvat",
///  "dateOfBirth":"1985-04-12","gender":"F"}
/// ```
pub async fn create_patient_handler<S>(
    State(state): State<AppState<S>>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(oib = %request.oib, "Processing patient create request");

    let patient = state.patients().create(request).await?;
    let location = format!("{}/api/patients/{}", state.base_url(), patient.id);
    Ok(responses::created(location, patient))
}

/// Replaces a patient's details. The OIB cannot be changed.
///
/// # HTTP Request
///
/// `PUT [base]/api/patients/[id]`
///
/// # Response
///
/// - `204 No Content` - Patient updated
/// - `400 Bad Request` - Invalid payload
/// - `404 Not Found` - No such patient
pub async fn update_patient_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(id, "Processing patient update request");

    state.patients().update(id, request).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Deletes a patient together with everything recorded for them.
///
/// # HTTP Request
///
/// `DELETE [base]/api/patients/[id]`
///
/// # Response
///
/// - `204 No Content` - Patient deleted
/// - `404 Not Found` - No such patient
pub async fn delete_patient_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(id, "Processing patient delete request");

    state.patients().delete(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
