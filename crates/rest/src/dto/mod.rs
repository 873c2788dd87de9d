//! Request payloads and response projections.
//!
//! Request types implement [`Validate`] and are extracted with
//! [`ValidatedJson`](crate::extractors::ValidatedJson). Response types are
//! camelCase JSON projections of the stored entities; examinations and
//! medical records embed the owning patient's name.

mod examination;
mod examination_file;
mod medical_record;
mod patient;
mod prescription;

pub use examination::{ExaminationDto, ExaminationRequest};
pub use examination_file::{ExaminationFileDto, FileResponseDto};
pub use medical_record::{CreateMedicalRecordRequest, MedicalRecordDto, UpdateMedicalRecordRequest};
pub use patient::{CreatePatientRequest, PatientDetailsDto, PatientDto, UpdatePatientRequest};
pub use prescription::{PrescriptionDto, PrescriptionRequest};

/// Field-level checks run after a payload deserializes.
pub trait Validate {
    /// Returns one message per violated constraint.
    fn validate(&self) -> Result<(), Vec<String>>;
}

/// Accumulates constraint violations for one payload.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<String>);

impl Violations {
    /// Required, non-blank, at most `max` characters.
    pub(crate) fn required(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.0.push(format!("{} is required", field));
        } else {
            self.max_len(field, value, max);
        }
        self
    }

    /// At most `max` characters when present.
    pub(crate) fn optional(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.max_len(field, value, max);
        }
        self
    }

    /// Exactly `len` characters.
    pub(crate) fn exact(&mut self, field: &str, value: &str, len: usize) -> &mut Self {
        if value.chars().count() != len {
            self.0
                .push(format!("{} must be exactly {} characters", field, len));
        }
        self
    }

    /// Adds a violation when `ok` is false.
    pub(crate) fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.0.push(message.into());
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), Vec<String>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.0))
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.0
                .push(format!("{} must be at most {} characters", field, max));
        }
    }
}

/// Date fields accept `YYYY-MM-DD` as well as full timestamps, of which only
/// the date part is kept.
pub(crate) mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de};

    pub(crate) fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
    }

    pub(crate) fn required<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw))),
        }
    }
}
