//! SQLite backend implementation.
//!
//! Supports both in-memory databases (used by the test suites) and file-based
//! databases (development and small deployments). Every pooled connection
//! enables `PRAGMA foreign_keys`, which the cascade deletes depend on.
//!
//! # Example
//!
//! ```no_run
//! use medsys_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! patients(id, oib UNIQUE, first_name, last_name, date_of_birth, gender, created_at)
//! medical_records(id, patient_id -> patients ON DELETE CASCADE, ...)
//! examinations(id, patient_id -> patients ON DELETE CASCADE, ...)
//! prescriptions(id, examination_id -> examinations ON DELETE CASCADE, ...)
//! examination_files(id, examination_id -> examinations ON DELETE CASCADE, ...)
//! ```
//!
//! Dates are stored as ISO-8601 text, timestamps as RFC 3339 text.

mod backend;
mod schema;
mod storage;
mod tables;

pub use backend::{SqliteBackend, SqliteBackendConfig};
