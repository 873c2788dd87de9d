use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// A clinical examination of one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Examination {
    /// Surrogate key.
    pub id: EntityId,
    /// Owning patient. Immutable.
    pub patient_id: EntityId,
    /// Examination category.
    pub examination_type: ExaminationType,
    /// When the examination took place.
    pub examination_date: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an examination.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExamination {
    /// Owning patient.
    pub patient_id: EntityId,
    /// Examination category.
    pub examination_type: ExaminationType,
    /// When the examination took place.
    pub examination_date: NaiveDate,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Examination category codes.
///
/// Codes are stored and exchanged verbatim (`"X-RAY"`, `"ULTRA"`, ...), never
/// longer than [`ExaminationType::MAX_CODE_LEN`] characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExaminationType {
    /// General practice.
    #[serde(rename = "GP")]
    GeneralPractice,
    /// Blood test.
    #[serde(rename = "KRV")]
    BloodTest,
    /// X-ray.
    #[serde(rename = "X-RAY")]
    XRay,
    /// Computed tomography.
    #[serde(rename = "CT")]
    Ct,
    /// Magnetic resonance.
    #[serde(rename = "MR")]
    Mr,
    /// Ultrasound.
    #[serde(rename = "ULTRA")]
    Ultrasound,
    /// Electrocardiogram.
    #[serde(rename = "EKG")]
    Ekg,
    /// Echocardiogram.
    #[serde(rename = "ECHO")]
    Echo,
    /// Eye examination.
    #[serde(rename = "EYE")]
    Eye,
    /// Dermatology.
    #[serde(rename = "DERM")]
    Dermatology,
    /// Dental.
    #[serde(rename = "DENTA")]
    Dental,
    /// Mammography.
    #[serde(rename = "MAMMO")]
    Mammography,
    /// Neurology.
    #[serde(rename = "NEURO")]
    Neurology,
}

impl ExaminationType {
    /// Maximum length of a stored code.
    pub const MAX_CODE_LEN: usize = 10;

    /// Every examination type.
    pub const ALL: [ExaminationType; 13] = [
        ExaminationType::GeneralPractice,
        ExaminationType::BloodTest,
        ExaminationType::XRay,
        ExaminationType::Ct,
        ExaminationType::Mr,
        ExaminationType::Ultrasound,
        ExaminationType::Ekg,
        ExaminationType::Echo,
        ExaminationType::Eye,
        ExaminationType::Dermatology,
        ExaminationType::Dental,
        ExaminationType::Mammography,
        ExaminationType::Neurology,
    ];

    /// Returns the stored code.
    pub fn as_code(&self) -> &'static str {
        match self {
            ExaminationType::GeneralPractice => "GP",
            ExaminationType::BloodTest => "KRV",
            ExaminationType::XRay => "X-RAY",
            ExaminationType::Ct => "CT",
            ExaminationType::Mr => "MR",
            ExaminationType::Ultrasound => "ULTRA",
            ExaminationType::Ekg => "EKG",
            ExaminationType::Echo => "ECHO",
            ExaminationType::Eye => "EYE",
            ExaminationType::Dermatology => "DERM",
            ExaminationType::Dental => "DENTA",
            ExaminationType::Mammography => "MAMMO",
            ExaminationType::Neurology => "NEURO",
        }
    }
}

impl fmt::Display for ExaminationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// An examination code outside the enumerated set.
#[derive(Debug, Clone, Error)]
#[error("unknown examination type: {0}")]
pub struct UnknownExaminationType(pub String);

impl FromStr for ExaminationType {
    type Err = UnknownExaminationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExaminationType::ALL
            .into_iter()
            .find(|t| t.as_code() == s)
            .ok_or_else(|| UnknownExaminationType(s.to_string()))
    }
}
