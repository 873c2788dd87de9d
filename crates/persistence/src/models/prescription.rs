use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A medication prescribed during an examination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    /// Surrogate key.
    pub id: EntityId,
    /// Owning examination. Immutable.
    pub examination_id: EntityId,
    /// Medication name.
    pub medication_name: String,
    /// Dosage, e.g. "500mg".
    pub dosage: Option<String>,
    /// Usage instructions.
    pub instructions: Option<String>,
    /// Date of the prescription.
    pub prescription_date: NaiveDate,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a prescription.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrescription {
    /// Owning examination.
    pub examination_id: EntityId,
    /// Medication name.
    pub medication_name: String,
    /// Dosage.
    pub dosage: Option<String>,
    /// Usage instructions.
    pub instructions: Option<String>,
    /// Date of the prescription.
    pub prescription_date: NaiveDate,
}
