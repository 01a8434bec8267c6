//! Direct file uploads through the backend storage endpoint.
//!
//! The backend proxies the bytes to blob storage: it concatenates the
//! `path` query parameter (a logical directory such as `products`) with the
//! multipart file name and returns the fully-qualified URL of the stored
//! object, which is parsed back into a container-relative path.

use crate::error::{StorageError, StorageResult};
use crate::naming::unique_file_name;
use crate::path::extract_relative_path;
use crate::storage_prefix;
use agritrace_api_client::ApiClient;
use agritrace_core::models::UploadResult;
use agritrace_core::AdminConfig;
use serde::Deserialize;

const DEFAULT_MAX_SIZE_MB: usize = 5;

/// Backend response for a direct upload.
#[derive(Debug, Deserialize)]
struct BackendUploadResponse {
    url: String,
}

/// Size and content-type constraints applied before an upload leaves the
/// process.
#[derive(Clone, Debug)]
pub struct UploadConstraints {
    pub max_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
}

impl UploadConstraints {
    pub fn new(max_size_mb: usize, allowed_content_types: Vec<String>) -> Self {
        UploadConstraints {
            max_size_bytes: max_size_mb * 1024 * 1024,
            allowed_content_types,
        }
    }

    /// Default constraints for image uploads (icons, logos): 5 MB, common
    /// web image types.
    pub fn images() -> Self {
        Self::new(
            DEFAULT_MAX_SIZE_MB,
            vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        )
    }

    /// Constraints for geo-area imports: geojson, kml, topojson, or zipped
    /// bundles.
    pub fn geo_areas() -> Self {
        Self::new(
            50,
            vec![
                "application/geo+json".to_string(),
                "application/vnd.google-earth.kml+xml".to_string(),
                "application/json".to_string(),
                "application/zip".to_string(),
            ],
        )
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        UploadConstraints {
            max_size_bytes: config.max_upload_size_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }

    /// Validate a file against these constraints. Fails fast before any
    /// network transfer; no partial upload is attempted.
    pub fn validate(&self, size: usize, content_type: &str) -> StorageResult<()> {
        if size > self.max_size_bytes {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.max_size_bytes,
            });
        }
        if !self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == content_type)
        {
            return Err(StorageError::UnsupportedContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.join(", "),
            });
        }
        Ok(())
    }
}

/// Uploads files to the backend-mediated storage endpoint.
#[derive(Clone, Debug)]
pub struct FileUploader {
    api: ApiClient,
}

impl FileUploader {
    pub fn new(api: ApiClient) -> Self {
        FileUploader { api }
    }

    /// Upload a file into a logical directory of the storage container.
    ///
    /// The file is renamed to a unique generated name before transfer; the
    /// backend concatenates `directory + "/" + file_name` to form the
    /// storage key. Network and server errors propagate to the caller; no
    /// retry is performed here.
    pub async fn upload(
        &self,
        original_name: &str,
        content_type: &str,
        data: Vec<u8>,
        directory: &str,
        constraints: &UploadConstraints,
    ) -> StorageResult<UploadResult> {
        constraints.validate(data.len(), content_type)?;

        let file_name = unique_file_name(original_name);
        let size = data.len() as u64;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.clone())
            .mime_str(content_type)
            .map_err(|e| StorageError::Transfer(anyhow::Error::new(e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: BackendUploadResponse = self
            .api
            .post_multipart(
                &format!("{}/upload", storage_prefix()),
                &[("path", directory.to_string())],
                form,
            )
            .await
            .map_err(StorageError::Transfer)?;

        let relative_path = extract_relative_path(&response.url);
        tracing::info!(path = %relative_path, size, "file uploaded");

        Ok(UploadResult {
            relative_path,
            file_name,
            size,
        })
    }
}
