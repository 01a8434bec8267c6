//! AgriTrace Storage Client Library
//!
//! Client for the backend-mediated blob storage used by the admin platform:
//! direct file uploads, signed read-URL resolution with caching, and batched
//! deletion. Files are addressed by container-relative paths (see the
//! `agritrace-core` crate docs); the storage provider itself is only ever
//! reached through the backend upload/delete endpoints and the signing
//! endpoint.
//!
//! # Upload flow
//!
//! A caller hands raw file bytes to [`FileUploader`], which validates them
//! against [`UploadConstraints`], renames the file to a collision-resistant
//! unique name, and posts it to the backend. The returned URL is parsed back
//! into a relative path which the caller persists on the owning entity
//! (a product icon, a company logo). Displaying the file later goes through
//! [`StorageClient::file_url`], which returns a time-limited signed URL and
//! caches it until close to expiry.

pub mod delete;
pub mod error;
pub mod naming;
pub mod path;
pub mod signed_url;
pub mod upload;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use naming::unique_file_name;
pub use path::extract_relative_path;
pub use signed_url::StorageClient;
pub use upload::{FileUploader, UploadConstraints};

/// Storage API path prefix (e.g. "/api/v1/storage"). Set
/// AGRITRACE_API_VERSION to match the server.
pub(crate) fn storage_prefix() -> String {
    let version = std::env::var("AGRITRACE_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}/storage", version)
}
