//! Prescription handlers.
//!
//! `[base]/api/examinations/[examination_id]/prescriptions`

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medsys_persistence::MedicalStore;
use medsys_persistence::models::EntityId;
use tracing::debug;

use crate::dto::PrescriptionRequest;
use crate::error::RestResult;
use crate::extractors::ValidatedJson;
use crate::responses;
use crate::state::AppState;

/// `GET [base]/api/examinations/[examination_id]/prescriptions`
pub async fn list_prescriptions_handler<S>(
    State(state): State<AppState<S>>,
    Path(examination_id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, "Processing prescription list request");

    let prescriptions = state.prescriptions().list(examination_id).await?;
    Ok(Json(prescriptions).into_response())
}

/// Issues a prescription.
///
/// Prescriptions have no single-item read, so `Location` points at the
/// examination's prescription list.
///
/// # HTTP Request
///
/// `POST [base]/api/examinations/[examination_id]/prescriptions`
///
/// # Response
///
/// - `201 Created` - Prescription created
/// - `400 Bad Request` - Invalid payload
/// - `404 Not Found` - No such examination
pub async fn create_prescription_handler<S>(
    State(state): State<AppState<S>>,
    Path(examination_id): Path<EntityId>,
    ValidatedJson(request): ValidatedJson<PrescriptionRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, "Processing prescription create request");

    let prescription = state.prescriptions().create(examination_id, request).await?;
    let location = format!(
        "{}/api/examinations/{}/prescriptions",
        state.base_url(),
        examination_id
    );
    Ok(responses::created(location, prescription))
}

/// `PUT [base]/api/examinations/[examination_id]/prescriptions/[id]`
pub async fn update_prescription_handler<S>(
    State(state): State<AppState<S>>,
    Path((examination_id, id)): Path<(EntityId, EntityId)>,
    ValidatedJson(request): ValidatedJson<PrescriptionRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, id, "Processing prescription update request");

    state
        .prescriptions()
        .update(examination_id, id, request)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE [base]/api/examinations/[examination_id]/prescriptions/[id]`
pub async fn delete_prescription_handler<S>(
    State(state): State<AppState<S>>,
    Path((examination_id, id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(examination_id, id, "Processing prescription delete request");

    state.prescriptions().delete(examination_id, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
