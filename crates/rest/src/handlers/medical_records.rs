//! Medical record handlers.
//!
//! `[base]/api/patients/[patient_id]/medicalrecords`
//!
//! Every route answers `404 Not Found` when the patient does not exist, or
//! when the record belongs to another patient.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use medsys_persistence::MedicalStore;
use medsys_persistence::models::EntityId;
use tracing::debug;

use crate::dto::{CreateMedicalRecordRequest, UpdateMedicalRecordRequest};
use crate::error::RestResult;
use crate::extractors::ValidatedJson;
use crate::responses;
use crate::state::AppState;

/// `GET [base]/api/patients/[patient_id]/medicalrecords`
pub async fn list_medical_records_handler<S>(
    State(state): State<AppState<S>>,
    Path(patient_id): Path<EntityId>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, "Processing medical record list request");

    let records = state.medical_records().list(patient_id).await?;
    Ok(Json(records).into_response())
}

/// `GET [base]/api/patients/[patient_id]/medicalrecords/[id]`
pub async fn get_medical_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing medical record read request");

    let record = state.medical_records().get(patient_id, id).await?;
    Ok(Json(record).into_response())
}

/// Adds a medical record to a patient.
///
/// # HTTP Request
///
/// `POST [base]/api/patients/[patient_id]/medicalrecords`
///
/// # Response
///
/// - `201 Created` - Record created, `Location` points at it
/// - `400 Bad Request` - Invalid payload
/// - `404 Not Found` - No such patient
pub async fn create_medical_record_handler<S>(
    State(state): State<AppState<S>>,
    Path(patient_id): Path<EntityId>,
    ValidatedJson(request): ValidatedJson<CreateMedicalRecordRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, "Processing medical record create request");

    let record = state.medical_records().create(patient_id, request).await?;
    let location = format!(
        "{}/api/patients/{}/medicalrecords/{}",
        state.base_url(),
        patient_id,
        record.id
    );
    Ok(responses::created(location, record))
}

/// `PUT [base]/api/patients/[patient_id]/medicalrecords/[id]`
pub async fn update_medical_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
    ValidatedJson(request): ValidatedJson<UpdateMedicalRecordRequest>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing medical record update request");

    state
        .medical_records()
        .update(patient_id, id, request)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE [base]/api/patients/[patient_id]/medicalrecords/[id]`
pub async fn delete_medical_record_handler<S>(
    State(state): State<AppState<S>>,
    Path((patient_id, id)): Path<(EntityId, EntityId)>,
) -> RestResult<Response>
where
    S: MedicalStore,
{
    debug!(patient_id, id, "Processing medical record delete request");

    state.medical_records().delete(patient_id, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
