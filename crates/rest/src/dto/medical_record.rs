use chrono::{DateTime, NaiveDate, Utc};
use medsys_persistence::models::{EntityId, MedicalRecord, NewMedicalRecord, Patient};
use serde::{Deserialize, Serialize};

use super::{Validate, Violations, dates};

const DISEASE_NAME_MAX: usize = 200;

/// Body of `POST /api/patients/{patientId}/medicalrecords`.
///
/// The owning patient comes from the path; a `patientId` in the body is
/// accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalRecordRequest {
    /// Ignored in favour of the path parameter.
    #[serde(default)]
    pub patient_id: Option<EntityId>,
    /// Diagnosis.
    pub disease_name: String,
    /// Onset date.
    #[serde(deserialize_with = "dates::required")]
    pub start_date: NaiveDate,
    /// Resolution date.
    #[serde(default, deserialize_with = "dates::optional")]
    pub end_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for CreateMedicalRecordRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        validate_record(&self.disease_name, self.start_date, self.end_date)
    }
}

impl CreateMedicalRecordRequest {
    /// Builds the insert payload for `patient_id`.
    pub fn into_new(self, patient_id: EntityId) -> NewMedicalRecord {
        NewMedicalRecord {
            patient_id,
            disease_name: self.disease_name,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
        }
    }
}

/// Body of `PUT /api/patients/{patientId}/medicalrecords/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicalRecordRequest {
    /// Diagnosis.
    pub disease_name: String,
    /// Onset date.
    #[serde(deserialize_with = "dates::required")]
    pub start_date: NaiveDate,
    /// Resolution date.
    #[serde(default, deserialize_with = "dates::optional")]
    pub end_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

impl Validate for UpdateMedicalRecordRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        validate_record(&self.disease_name, self.start_date, self.end_date)
    }
}

impl UpdateMedicalRecordRequest {
    /// Copies the mutable fields onto `record`.
    pub fn apply_to(self, record: &mut MedicalRecord) {
        record.disease_name = self.disease_name;
        record.start_date = self.start_date;
        record.end_date = self.end_date;
        record.description = self.description;
    }
}

fn validate_record(
    disease_name: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), Vec<String>> {
    Violations::default()
        .required("diseaseName", disease_name, DISEASE_NAME_MAX)
        .check(
            end_date.is_none_or(|end| end >= start_date),
            "endDate must not be before startDate",
        )
        .finish()
}

/// A medical record with the owning patient's name and OIB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordDto {
    /// Record id.
    pub id: EntityId,
    /// Owning patient.
    pub patient_id: EntityId,
    /// Diagnosis.
    pub disease_name: String,
    /// Onset date.
    pub start_date: NaiveDate,
    /// Resolution date.
    pub end_date: Option<NaiveDate>,
    /// Free-text notes.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// "First Last" of the owning patient.
    pub patient_name: String,
    /// OIB of the owning patient.
    #[serde(rename = "patientOIB")]
    pub patient_oib: String,
}

impl MedicalRecordDto {
    /// Projects `record`, which must belong to `patient`.
    pub fn new(record: MedicalRecord, patient: &Patient) -> Self {
        Self {
            id: record.id,
            patient_id: record.patient_id,
            disease_name: record.disease_name,
            start_date: record.start_date,
            end_date: record.end_date,
            description: record.description,
            created_at: record.created_at,
            patient_name: patient.display_name(),
            patient_oib: patient.oib.clone(),
        }
    }
}
