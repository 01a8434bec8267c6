use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access mode requested from the signing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    Read,
    Write,
}

/// Request body for the signed-URL issuance endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    /// Container-relative path of the object, e.g. `products/abc123.jpg`.
    pub path: String,
    pub mode: AccessMode,
    pub ttl_minutes: i64,
}

/// Signed URL issued for a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    /// Fully-qualified, time-limited URL.
    pub url: String,
    pub expires_on: DateTime<Utc>,
    /// Permission string granted by the signer, e.g. `r`.
    pub permissions: String,
}

/// Record produced by a successful direct upload. Immutable; the caller
/// merges `relative_path` into the owning entity's persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Container-relative path of the stored object.
    pub relative_path: String,
    /// Generated unique file name, e.g. `1762796962258-nti3ijgo.jpg`.
    pub file_name: String,
    /// Size of the uploaded file in bytes.
    pub size: u64,
}
