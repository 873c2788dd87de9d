use chrono::{DateTime, NaiveDate, Utc};
use medsys_persistence::models::{
    EntityId, Examination, ExaminationDetails, ExaminationType, NewExamination,
};
use serde::{Deserialize, Serialize};

use super::{ExaminationFileDto, PrescriptionDto, Validate, Violations, dates};

/// Body of examination create and update requests.
///
/// Both operations take the same shape. The owning patient comes from the
/// path, so `patientId` is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaminationRequest {
    /// Ignored in favour of the path parameter.
    #[serde(default)]
    pub patient_id: Option<EntityId>,
    /// Examination type code.
    pub examination_type: ExaminationType,
    /// Date of the examination.
    #[serde(deserialize_with = "dates::required")]
    pub examination_date: NaiveDate,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

// The type code is checked by deserialization; only its length is left.
impl Validate for ExaminationRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        Violations::default()
            .check(
                self.examination_type.as_code().len() <= ExaminationType::MAX_CODE_LEN,
                format!(
                    "examinationType must be at most {} characters",
                    ExaminationType::MAX_CODE_LEN
                ),
            )
            .finish()
    }
}

impl ExaminationRequest {
    /// Builds the insert payload for `patient_id`.
    pub fn into_new(self, patient_id: EntityId) -> NewExamination {
        NewExamination {
            patient_id,
            examination_type: self.examination_type,
            examination_date: self.examination_date,
            notes: self.notes,
        }
    }

    /// Copies the mutable fields onto `examination`.
    pub fn apply_to(self, examination: &mut Examination) {
        examination.examination_type = self.examination_type;
        examination.examination_date = self.examination_date;
        examination.notes = self.notes;
    }
}

/// An examination with its patient's name, prescriptions and files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaminationDto {
    /// Examination id.
    pub id: EntityId,
    /// Owning patient.
    pub patient_id: EntityId,
    /// Examination type code.
    pub examination_type: ExaminationType,
    /// Date of the examination.
    pub examination_date: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// "First Last" of the owning patient.
    pub patient_name: String,
    /// Prescriptions, ordered by id.
    pub prescriptions: Vec<PrescriptionDto>,
    /// Attached files, ordered by id.
    pub examination_files: Vec<ExaminationFileDto>,
}

impl From<ExaminationDetails> for ExaminationDto {
    fn from(details: ExaminationDetails) -> Self {
        let examination = details.examination;
        Self {
            id: examination.id,
            patient_id: examination.patient_id,
            examination_type: examination.examination_type,
            examination_date: examination.examination_date,
            notes: examination.notes,
            created_at: examination.created_at,
            patient_name: details.patient.display_name(),
            prescriptions: details
                .prescriptions
                .into_iter()
                .map(PrescriptionDto::from)
                .collect(),
            examination_files: details
                .files
                .into_iter()
                .map(ExaminationFileDto::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_parses_type_code() {
        let request: ExaminationRequest = serde_json::from_value(json!({
            "patientId": 99,
            "examinationType": "X-RAY",
            "examinationDate": "2024-05-02T09:30:00"
        }))
        .unwrap();

        assert_eq!(request.examination_type, ExaminationType::XRay);
        assert!(request.notes.is_none());
        assert!(request.validate().is_ok());

        let new = request.into_new(4);
        assert_eq!(new.patient_id, 4);
    }

    #[test]
    fn test_request_rejects_unknown_type() {
        let result: Result<ExaminationRequest, _> = serde_json::from_value(json!({
            "examinationType": "BLOOD",
            "examinationDate": "2024-05-02"
        }));
        assert!(result.is_err());
    }
}
