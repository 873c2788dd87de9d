use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EntityId;

/// A patient, identified by the business key `oib`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Surrogate key.
    pub id: EntityId,
    /// 11-character personal identification number. Unique, never updated.
    pub oib: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender code.
    pub gender: Gender,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Patient {
    /// Returns "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields supplied when creating a patient.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    /// Personal identification number.
    pub oib: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Gender code.
    pub gender: Gender,
}

/// Single-character gender code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// `M`
    #[serde(rename = "M")]
    Male,
    /// `F`
    #[serde(rename = "F")]
    Female,
    /// `O`
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    /// Returns the stored code.
    pub fn as_code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A gender code outside `M`, `F`, `O`.
#[derive(Debug, Clone, Error)]
#[error("unknown gender code: {0}")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            "O" => Ok(Gender::Other),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            assert_eq!(gender.as_code().parse::<Gender>().unwrap(), gender);
        }
        assert!("X".parse::<Gender>().is_err());
        assert!("m".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"F\"");
    }

    #[test]
    fn test_display_name() {
        let patient = Patient {
            id: 1,
            oib: "12345678901".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Horvat".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: Gender::Female,
            created_at: Utc::now(),
        };
        assert_eq!(patient.display_name(), "Ana Horvat");
    }
}
