//! Request body fixtures.

use serde_json::{Value, json};

/// A valid patient create body.
pub fn patient_json(oib: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "oib": oib,
        "firstName": first_name,
        "lastName": last_name,
        "dateOfBirth": "1985-04-12",
        "gender": "F"
    })
}

/// A valid medical record body.
pub fn medical_record_json(disease_name: &str) -> Value {
    json!({
        "diseaseName": disease_name,
        "startDate": "2023-01-10",
        "endDate": null,
        "description": "Seasonal"
    })
}

/// A valid examination body.
pub fn examination_json(examination_type: &str) -> Value {
    json!({
        "examinationType": examination_type,
        "examinationDate": "2024-02-20",
        "notes": "Routine check"
    })
}

/// A valid prescription body.
pub fn prescription_json(medication_name: &str) -> Value {
    json!({
        "medicationName": medication_name,
        "dosage": "400mg",
        "instructions": "Twice daily after meals",
        "prescriptionDate": "2024-02-20"
    })
}
