//! Shared HTTP client for the AgriTrace admin API.
//!
//! Provides a minimal client with configurable auth (Bearer token, API key,
//! or none while a token is pending), generic request helpers, centralized
//! error normalization, in-flight request tracking, and typed domain methods
//! (products, companies, company documents). The storage client and CLI
//! crates use this client directly.

pub mod api;
pub mod error;
pub mod loading;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use error::ApiError;
pub use loading::{LoadingGuard, LoadingTracker};

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
    /// No credentials yet; requests go out without an Authorization header.
    None,
}

/// Admin API path prefix (e.g. "/api/v1/admin"). Set AGRITRACE_API_VERSION
/// to match the server.
pub fn admin_prefix() -> String {
    let version = std::env::var("AGRITRACE_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}/admin", version)
}

/// HTTP client for the AgriTrace admin API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
    tracker: LoadingTracker,
    background: bool,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
            tracker: LoadingTracker::new(),
            background: false,
        })
    }

    /// Create client from environment: AGRITRACE_API_URL (or API_URL) and
    /// AGRITRACE_API_TOKEN. Without a token, requests carry no credentials.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("AGRITRACE_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let auth = match std::env::var("AGRITRACE_API_TOKEN") {
            Ok(token) if !token.is_empty() => Auth::Bearer(token),
            _ => Auth::None,
        };

        Self::new(base_url, auth)
    }

    /// Create client from an [`AdminConfig`](agritrace_core::AdminConfig).
    pub fn from_config(config: &agritrace_core::AdminConfig) -> Result<Self> {
        let auth = match &config.api_token {
            Some(token) => Auth::Bearer(token.clone()),
            None => Auth::None,
        };
        Self::new(config.api_url.clone(), auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Tracker of in-flight foreground requests, for UI busy indicators.
    pub fn tracker(&self) -> &LoadingTracker {
        &self.tracker
    }

    /// A clone of this client whose requests bypass the loading tracker.
    /// Used for fast, frequent background calls whose latency should not
    /// visually block the interface.
    pub fn background(&self) -> ApiClient {
        let mut client = self.clone();
        client.background = true;
        client
    }

    /// Resolve a request path against the base URL. Absolute http(s) URLs
    /// (e.g. the signing endpoint, which lives on another host) pass
    /// through unchanged.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
            Auth::None => request,
        }
    }

    /// Send a prepared request: apply auth, track it unless this client is
    /// marked background, and normalize non-2xx responses into [`ApiError`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = self.apply_auth(request);
        let _guard = (!self.background).then(|| self.tracker.begin());

        let response = request.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(status = status.as_u16(), body = %body, "API request failed");
            return Err(ApiError::new(status.as_u16(), body));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        self.send_json(self.client.post(&url).json(body)).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        self.send_json(self.client.patch(&url).json(body)).await
    }

    /// POST JSON body, ignoring any response payload.
    pub async fn post_json_unit<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.build_url(path);
        self.send(self.client.post(&url).json(body)).await?;
        Ok(())
    }

    /// POST multipart form with optional query parameters and deserialize
    /// response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.post(&url).multipart(form);
        if !query.is_empty() {
            request = request.query(query);
        }
        self.send_json(request).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }

    /// Raw client for custom requests (e.g. a direct PUT to a signed URL,
    /// which must not carry backend credentials).
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_url_passes_absolute_urls_through() {
        let client = ApiClient::new("http://localhost:8080".to_string(), Auth::None).unwrap();
        assert_eq!(
            client.build_url("https://sign.example.com/api/sas"),
            "https://sign.example.com/api/sas"
        );
        assert_eq!(
            client.build_url("/api/v1/admin/products"),
            "http://localhost:8080/api/v1/admin/products"
        );
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/admin/products/missing")
            .with_status(404)
            .with_body(r#"{"message":"no such product"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Auth::None).unwrap();
        let result: Result<serde_json::Value> =
            client.get("/api/v1/admin/products/missing", &[]).await;

        let err = result.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().expect("ApiError");
        assert_eq!(api_err.status, 404);
        assert_eq!(
            api_err.user_message(),
            "The requested resource was not found."
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bearer_auth_is_applied() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("Authorization", "Bearer token-123")
            .with_body("{}")
            .create_async()
            .await;

        let client =
            ApiClient::new(server.url(), Auth::Bearer("token-123".to_string())).unwrap();
        let _: serde_json::Value = client.get("/ping", &[]).await.unwrap();
        mock.assert_async().await;
    }
}
