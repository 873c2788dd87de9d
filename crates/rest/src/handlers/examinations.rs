//! Examination handlers.
//!
//! `[base]/api/patients/[patient_id]/examinations`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medsys_persistence::MedicalStore;
use medsys_persistence::models::EntityId;
use tracing::debug;

use crate::dto::ExaminationRequest;
use crate::error::RestResult;
use crate::extractors::ValidatedJson;
use crate::responses;
use crate::state::AppState;

/// Lists a patient's examinations, each with its prescriptions and files.
///
/// # HTTP Request
///
/// `GET [base]/api/patients/[patient_id]/examinations`
///
/// # Response
///
/// - `200 OK` - JSON array of examinations
/// - `404 Not Found` - No such patient
pub async fn list_examinations_handler<S>(
    State(state): State<AppState<S>>,
    Path(patient_id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, "Processing examination list request");

    let examinations = state.examinations().list(patient_id).await?;
    Ok(Json(examinations).into_response())
}

/// Reads one examination of a patient.
///
/// # HTTP Request
///
/// `GET [base]/api/patients/[patient_id]/examinations/[id]`
///
/// # Response
///
/// - `200 OK` - The examination
/// - `404 Not Found` - No such patient, or the examination is not theirs
pub async fn get_examination_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing examination read request");

    let examination = state.examinations().get(patient_id, id).await?;
    Ok(Json(examination).into_response())
}

/// Records an examination.
///
/// # HTTP Request
///
/// `POST [base]/api/patients/[patient_id]/examinations`
///
/// # Response
///
/// - `201 Created` - Examination created, `Location` points at it
/// - `400 Bad Request` - Invalid payload or unknown examination type
/// - `404 Not Found` - No such patient
///
/// # Example
///
/// ```http
/// POST /api/patients/1/examinations HTTP/1.1
/// Content-Type: application/json
///
/// {"examinationType":"EKG","examinationDate":"2024-02-20","notes":"Resting"}
/// ```
pub async fn create_examination_handler<S>(
    State(state): State<AppState<S>>,
    Path(patient_id): Path<EntityId>,
    ValidatedJson(request): ValidatedJson<ExaminationRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, "Processing examination create request");

    let examination = state.examinations().create(patient_id, request).await?;
    let location = format!(
        "{}/api/patients/{}/examinations/{}",
        state.base_url(),
        patient_id,
        examination.id
    );
    Ok(responses::created(location, examination))
}

/// Replaces an examination's type, date and notes.
///
/// # HTTP Request
///
/// `PUT [base]/api/patients/[patient_id]/examinations/[id]`
pub async fn update_examination_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
    ValidatedJson(request): ValidatedJson<ExaminationRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing examination update request");

    state.examinations().update(patient_id, id, request).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Deletes an examination with its prescriptions and file records.
///
/// # HTTP Request
///
/// `DELETE [base]/api/patients/[patient_id]/examinations/[id]`
pub async fn delete_examination_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing examination delete request");

    state.examinations().delete(patient_id, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
