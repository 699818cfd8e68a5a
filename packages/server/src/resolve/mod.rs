//! Read, render, and delete paths shared by the HTTP handlers.
//!
//! Every read path ends the same way: sniff the MIME type of the buffer about
//! to be served, issue its ETag, and hand both back with the bytes. Comparing
//! the tag against `If-None-Match` is left to the caller.

mod cascade;
mod inflight;
mod original;
mod thumbnail;

use common::storage::StorageError;
use thiserror::Error;

pub use cascade::{cascade_delete, delete_original};
pub use inflight::InflightBuilds;
pub use original::{resolve_original, store_original};
pub use thumbnail::resolve_thumbnail;

/// A buffer ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub etag: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

/// Classify a failure to read or remove an original.
fn original_error(path: &str, err: StorageError) -> ResolveError {
    match err {
        StorageError::NotFound(_) => ResolveError::NotFound(format!("original {path} not found")),
        StorageError::InvalidKey(msg) => ResolveError::BadRequest(msg),
        other => ResolveError::Internal(format!("original {path}: {other}")),
    }
}
