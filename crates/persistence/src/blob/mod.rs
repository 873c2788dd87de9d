//! Storage gateway for examination attachments.
//!
//! [`BlobStore`] moves opaque byte blobs in and out of an object store. The
//! entity store keeps only the returned path; nothing here knows about
//! examinations beyond the folder name it is given.
//!
//! - [`HttpBlobStore`] - Supabase-style storage REST API over reqwest
//! - [`InMemoryBlobStore`] - process-local map for development and tests

mod client;
mod config;
mod http;
mod memory;

pub use client::{generate_blob_path, BlobError, BlobResult, BlobStore, BlobUpload};
pub use config::BlobStoreConfig;
pub use http::HttpBlobStore;
pub use memory::InMemoryBlobStore;
