//! Error normalization for backend API responses.
//!
//! Non-2xx responses and connectivity failures become an [`ApiError`]
//! carrying the HTTP status and the raw response body. The raw body stays
//! available for logs; [`ApiError::user_message`] maps status classes to
//! operator-facing text.

use serde::Deserialize;

/// Status code used for connectivity failures (the request never reached
/// the server, so there is no HTTP status to report).
pub const STATUS_UNREACHABLE: u16 = 0;

/// A failed backend API call.
#[derive(Debug, thiserror::Error)]
#[error("API request failed with status {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    /// Raw response body, or the transport error text for connectivity
    /// failures.
    pub message: String,
}

/// Body shape the backend uses for error payloads.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn from_transport(err: reqwest::Error) -> Self {
        let status = err
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(STATUS_UNREACHABLE);
        ApiError::new(status, err.to_string())
    }

    /// Message field from the backend's JSON error body, if present.
    fn backend_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.message)
            .ok()
            .map(|body| body.message)
    }

    /// Operator-facing message for this failure.
    pub fn user_message(&self) -> String {
        match self.status {
            STATUS_UNREACHABLE => {
                "Could not reach the server. Check your network connection.".to_string()
            }
            400 => self
                .backend_message()
                .unwrap_or_else(|| "Invalid request. Check the submitted data.".to_string()),
            401 => "Session expired. Please sign in again.".to_string(),
            403 => "You do not have permission to perform this action.".to_string(),
            404 => "The requested resource was not found.".to_string(),
            409 => self
                .backend_message()
                .unwrap_or_else(|| "The resource already exists.".to_string()),
            422 => self
                .backend_message()
                .unwrap_or_else(|| "Validation failed. Check the submitted data.".to_string()),
            500 => "Internal server error. Please try again later.".to_string(),
            503 => "The service is unavailable. Please try again later.".to_string(),
            _ => format!("Error {}: {}", self.status, self.message),
        }
    }
}
