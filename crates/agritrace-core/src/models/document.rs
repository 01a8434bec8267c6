use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of document a company can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Tax registration certificate (mandatory).
    Ruc,
    /// Operating licenses.
    License,
    /// Certifications (organic, fair trade, ...).
    Certificate,
    /// Power of attorney of the legal representative.
    PowerOfAttorney,
    Other,
}

/// Verification state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Upload started but not yet confirmed.
    Pending,
    Uploaded,
    Verified,
    Rejected,
}

/// A document attached to a company record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDocument {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Name of the object in storage, e.g. `company-123/ruc-20123456789.pdf`.
    pub file_name: String,
    pub original_file_name: String,
    pub document_type: DocumentType,
    pub file_size: u64,
    pub mime_type: String,
    /// Fully-qualified storage URL of the object.
    pub blob_url: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub status: DocumentStatus,
}

/// Request body asking the backend for a write-mode signed upload URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUploadUrl {
    pub file_name: String,
    /// MIME type of the file to be uploaded.
    pub file_type: String,
    pub document_type: DocumentType,
}

/// Signed upload URL granted by the backend. Single-use; expires at
/// `expires_at` and is never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlGrant {
    pub upload_url: String,
    /// Full object name within the container.
    pub blob_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Request body confirming a completed direct upload so the backend can
/// register the document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUpload {
    pub file_name: String,
    pub original_file_name: String,
    pub document_type: DocumentType,
    pub file_size: u64,
    pub mime_type: String,
    pub blob_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&DocumentType::PowerOfAttorney).unwrap(),
            "\"power_of_attorney\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn upload_url_grant_uses_camel_case() {
        let json = r#"{
            "uploadUrl": "https://storage.example.com/documents/company-1/ruc.pdf?sig=abc",
            "blobName": "company-1/ruc.pdf",
            "expiresAt": "2026-01-01T00:00:00Z"
        }"#;
        let grant: UploadUrlGrant = serde_json::from_str(json).unwrap();
        assert_eq!(grant.blob_name, "company-1/ruc.pdf");
    }
}
