use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A diagnosis episode belonging to one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    /// Surrogate key.
    pub id: EntityId,
    /// Owning patient. Immutable.
    pub patient_id: EntityId,
    /// Name of the disease.
    pub disease_name: String,
    /// When the episode started.
    pub start_date: NaiveDate,
    /// When the episode ended, if it has.
    pub end_date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a medical record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicalRecord {
    /// Owning patient.
    pub patient_id: EntityId,
    /// Name of the disease.
    pub disease_name: String,
    /// When the episode started.
    pub start_date: NaiveDate,
    /// When the episode ended, if it has.
    pub end_date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
}
