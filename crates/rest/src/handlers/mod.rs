//! HTTP request handlers.
//!
//! - [`patients`] - Patient CRUD, OIB lookup, search and details
//! - [`medical_records`] - A patient's medical records
//! - [`examinations`] - A patient's examinations
//! - [`prescriptions`] - An examination's prescriptions
//! - [`examination_files`] - An examination's files (upload, download, delete)
//! - [`health`] - Health check endpoints

pub mod examination_files;
pub mod examinations;
pub mod health;
pub mod medical_records;
pub mod patients;
pub mod prescriptions;

// Re-export handlers for convenience
pub use examination_files::{
    delete_file_handler, download_file_handler, list_files_handler, upload_file_handler,
};
pub use examinations::{
    create_examination_handler, delete_examination_handler, get_examination_handler,
    list_examinations_handler, update_examination_handler,
};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use medical_records::{
    create_medical_record_handler, delete_medical_record_handler, get_medical_record_handler,
    list_medical_records_handler, update_medical_record_handler,
};
pub use patients::{
    create_patient_handler, delete_patient_handler, get_patient_by_oib_handler,
    get_patient_details_handler, get_patient_handler, list_patients_handler,
    update_patient_handler,
};
pub use prescriptions::{
    create_prescription_handler, delete_prescription_handler, list_prescriptions_handler,
    update_prescription_handler,
};
