//! PostgreSQL backend implementation.
//!
//! Connection pooling via deadpool-postgres, native `DATE` and `TIMESTAMPTZ`
//! columns, and one database transaction per unit of work.
//!
//! # Example
//!
//! ```no_run
//! use medsys_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//!
//! # async fn main_example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//! backend.init_schema().await?;
//! # Ok(())
//! # }
//! ```

mod backend;
pub(crate) mod schema;
mod storage;
mod tables;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
