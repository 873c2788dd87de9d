use chrono::{DateTime, NaiveDate, Utc};
use medsys_persistence::models::{EntityId, Gender, NewPatient, Patient, PatientDetails};
use serde::{Deserialize, Serialize};

use super::{ExaminationDto, MedicalRecordDto, Validate, Violations, dates};

const OIB_LEN: usize = 11;
const NAME_MAX: usize = 100;

/// Body of `POST /api/patients`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    /// National identifier, exactly 11 characters.
    #[serde(alias = "OIB")]
    pub oib: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    #[serde(deserialize_with = "dates::required")]
    pub date_of_birth: NaiveDate,
    /// Gender code.
    pub gender: Gender,
}

impl Validate for CreatePatientRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        Violations::default()
            .exact("oib", &self.oib, OIB_LEN)
            .required("firstName", &self.first_name, NAME_MAX)
            .required("lastName", &self.last_name, NAME_MAX)
            .finish()
    }
}

impl From<CreatePatientRequest> for NewPatient {
    fn from(request: CreatePatientRequest) -> Self {
        NewPatient {
            oib: request.oib,
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
        }
    }
}

/// Body of `PUT /api/patients/{id}`.
///
/// The OIB is immutable and therefore absent; a client-supplied `oib` field
/// is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    #[serde(deserialize_with = "dates::required")]
    pub date_of_birth: NaiveDate,
    /// Gender code.
    pub gender: Gender,
}

impl Validate for UpdatePatientRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        Violations::default()
            .required("firstName", &self.first_name, NAME_MAX)
            .required("lastName", &self.last_name, NAME_MAX)
            .finish()
    }
}

impl UpdatePatientRequest {
    /// Copies the mutable fields onto `patient`.
    pub fn apply_to(self, patient: &mut Patient) {
        patient.first_name = self.first_name;
        patient.last_name = self.last_name;
        patient.date_of_birth = self.date_of_birth;
        patient.gender = self.gender;
    }
}

/// A patient as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    /// Patient id.
    pub id: EntityId,
    /// National identifier.
    pub oib: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender code.
    pub gender: Gender,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Patient> for PatientDto {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            oib: patient.oib,
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            created_at: patient.created_at,
        }
    }
}

/// A patient with every medical record and examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetailsDto {
    /// The patient's own fields.
    #[serde(flatten)]
    pub patient: PatientDto,
    /// Medical records, ordered by id.
    pub medical_records: Vec<MedicalRecordDto>,
    /// Examinations with prescriptions and files, ordered by id.
    pub examinations: Vec<ExaminationDto>,
}

impl From<PatientDetails> for PatientDetailsDto {
    fn from(details: PatientDetails) -> Self {
        let medical_records = details
            .medical_records
            .into_iter()
            .map(|record| MedicalRecordDto::new(record, &details.patient))
            .collect();
        let examinations = details
            .examinations
            .into_iter()
            .map(ExaminationDto::from)
            .collect();

        Self {
            patient: details.patient.into(),
            medical_records,
            examinations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_accepts_dotnet_style_payload() {
        let request: CreatePatientRequest = serde_json::from_value(json!({
            "OIB": "12345678901",
            "firstName": "Ana",
            "lastName": "Horvat",
            "dateOfBirth": "1990-04-12T00:00:00",
            "gender": "F"
        }))
        .unwrap();

        assert_eq!(request.oib, "12345678901");
        assert_eq!(request.gender, Gender::Female);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_short_oib() {
        let request: CreatePatientRequest = serde_json::from_value(json!({
            "oib": "123",
            "firstName": "Ana",
            "lastName": "",
            "dateOfBirth": "1990-04-12",
            "gender": "F"
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("oib")));
        assert!(errors.iter().any(|e| e.starts_with("lastName")));
    }

    #[test]
    fn test_unknown_gender_fails_to_parse() {
        let result: Result<CreatePatientRequest, _> = serde_json::from_value(json!({
            "oib": "12345678901",
            "firstName": "Ana",
            "lastName": "Horvat",
            "dateOfBirth": "1990-04-12",
            "gender": "X"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patient_dto_shape() {
        let dto = PatientDto {
            id: 7,
            oib: "12345678901".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Horvat".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12).unwrap(),
            gender: Gender::Female,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["firstName"], "Ana");
        assert_eq!(value["dateOfBirth"], "1990-04-12");
        assert_eq!(value["gender"], "F");
    }
}
