//! Common test utilities for REST API testing.
//!
//! - [`harness`] - Test server over in-memory SQLite and blob stores
//! - [`fixtures`] - Request bodies

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
