//! Configuration module
//!
//! Environment-driven configuration for the admin client toolkit: backend
//! API base URL, signing endpoint, storage container base URL, and upload
//! constraints. All endpoint URLs are treated as opaque strings supplied by
//! the hosting environment.

use std::env;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const MAX_UPLOAD_SIZE_MB: usize = 5;
const SIGNED_URL_TTL_MINUTES: i64 = 5;

/// Configuration for the admin client toolkit.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    /// Base URL of the admin backend API.
    pub api_url: String,
    /// Bearer token for the backend API, if already issued.
    pub api_token: Option<String>,
    /// URL of the signed-URL issuance endpoint.
    pub sign_url: String,
    /// Base URL of the storage container (host + container segment).
    pub storage_base_url: String,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size_bytes: usize,
    /// MIME types accepted for image uploads.
    pub allowed_content_types: Vec<String>,
    /// Validity window requested for signed read URLs.
    pub signed_url_ttl_minutes: i64,
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let api_url = env::var("AGRITRACE_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let sign_url = env::var("AGRITRACE_SIGN_URL")
            .map_err(|_| anyhow::anyhow!("AGRITRACE_SIGN_URL must be set"))?;

        let storage_base_url = env::var("AGRITRACE_STORAGE_BASE_URL")
            .map_err(|_| anyhow::anyhow!("AGRITRACE_STORAGE_BASE_URL must be set"))?;

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "image/jpeg,image/png,image/webp".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .collect();

        let config = AdminConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: env::var("AGRITRACE_API_TOKEN").ok().filter(|t| !t.is_empty()),
            sign_url,
            storage_base_url: storage_base_url.trim_end_matches('/').to_string(),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            allowed_content_types,
            signed_url_ttl_minutes: env::var("SIGNED_URL_TTL_MINUTES")
                .unwrap_or_else(|_| SIGNED_URL_TTL_MINUTES.to_string())
                .parse()
                .unwrap_or(SIGNED_URL_TTL_MINUTES),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        for (name, value) in [
            ("AGRITRACE_API_URL", &self.api_url),
            ("AGRITRACE_SIGN_URL", &self.sign_url),
            ("AGRITRACE_STORAGE_BASE_URL", &self.storage_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
            }
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than zero"));
        }

        if self.signed_url_ttl_minutes <= 0 {
            return Err(anyhow::anyhow!(
                "SIGNED_URL_TTL_MINUTES must be greater than zero"
            ));
        }

        Ok(())
    }
}
