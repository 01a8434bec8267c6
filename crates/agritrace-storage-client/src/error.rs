//! Storage operation errors.
//!
//! Validation errors are raised synchronously before any network call.
//! Transfer failures always propagate to the caller; retrying is the
//! caller's responsibility.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File size {size} exceeds the {max} byte limit")]
    FileTooLarge { size: usize, max: usize },

    #[error("Content type {content_type} is not allowed (allowed: {allowed})")]
    UnsupportedContentType {
        content_type: String,
        allowed: String,
    },

    #[error("Transfer failed: {0}")]
    Transfer(#[source] anyhow::Error),

    #[error("Signed URL request failed: {0}")]
    SignFailed(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
