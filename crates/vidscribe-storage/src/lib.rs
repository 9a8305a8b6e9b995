//! Bucket-oriented HTTP object-storage client.
//!
//! This crate provides:
//! - Authenticated upload/download against `{base}/storage/v1/object/...`
//! - The deterministic public-URL convention shared with the API's
//!   redirect handlers
//! - The [`ObjectStorage`] trait so test doubles can be substituted
//!   without network access

pub mod client;
pub mod error;

pub use client::{ObjectStorage, StorageClient, StorageConfig};
pub use error::{StorageError, StorageResult};
