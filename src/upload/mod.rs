//! Upload module
//!
//! Defines the upload seam used by the pipeline and its S3 implementation.
//! An upload is attempted exactly once: there is no retry and a failure only
//! affects the one candidate it belongs to.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod key;
pub mod put_object;

pub use key::KeyGenerator;
pub use put_object::S3Uploader;

/// Upload errors
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("S3 error {code}: {message}")]
    Service { code: String, message: String },

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request error: {0}")]
    Request(String),
}

/// A classified file ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub source_path: PathBuf,
    /// Extension without the leading dot
    pub extension: String,
    pub mime_type: String,
    pub object_key: String,
}

/// Successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub object_key: String,
    /// Canonical location reported for the stored object
    pub location: String,
}

/// Upload handler trait
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the candidate's file under its object key
    async fn upload(&self, candidate: &UploadCandidate) -> Result<UploadReceipt, UploadError>;
}
