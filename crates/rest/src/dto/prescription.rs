use chrono::{DateTime, NaiveDate, Utc};
use medsys_persistence::models::{EntityId, NewPrescription, Prescription};
use serde::{Deserialize, Serialize};

use super::{Validate, Violations, dates};

const MEDICATION_NAME_MAX: usize = 200;
const DOSAGE_MAX: usize = 100;

/// Body of prescription create and update requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRequest {
    /// Medication.
    pub medication_name: String,
    /// Dosage, e.g. "500mg".
    #[serde(default)]
    pub dosage: Option<String>,
    /// Usage instructions.
    #[serde(default)]
    pub instructions: Option<String>,
    /// Date of issue.
    #[serde(deserialize_with = "dates::required")]
    pub prescription_date: NaiveDate,
}

impl Validate for PrescriptionRequest {
    fn validate(&self) -> Result<(), Vec<String>> {
        Violations::default()
            .required("medicationName", &self.medication_name, MEDICATION_NAME_MAX)
            .optional("dosage", self.dosage.as_deref(), DOSAGE_MAX)
            .finish()
    }
}

impl PrescriptionRequest {
    /// Builds the insert payload for `examination_id`.
    pub fn into_new(self, examination_id: EntityId) -> NewPrescription {
        NewPrescription {
            examination_id,
            medication_name: self.medication_name,
            dosage: self.dosage,
            instructions: self.instructions,
            prescription_date: self.prescription_date,
        }
    }

    /// Copies the mutable fields onto `prescription`.
    pub fn apply_to(self, prescription: &mut Prescription) {
        prescription.medication_name = self.medication_name;
        prescription.dosage = self.dosage;
        prescription.instructions = self.instructions;
        prescription.prescription_date = self.prescription_date;
    }
}

/// A prescription as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDto {
    /// Prescription id.
    pub id: EntityId,
    /// Owning examination.
    pub examination_id: EntityId,
    /// Medication.
    pub medication_name: String,
    /// Dosage.
    pub dosage: Option<String>,
    /// Usage instructions.
    pub instructions: Option<String>,
    /// Date of issue.
    pub prescription_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Prescription> for PrescriptionDto {
    fn from(prescription: Prescription) -> Self {
        Self {
            id: prescription.id,
            examination_id: prescription.examination_id,
            medication_name: prescription.medication_name,
            dosage: prescription.dosage,
            instructions: prescription.instructions,
            prescription_date: prescription.prescription_date,
            created_at: prescription.created_at,
        }
    }
}
