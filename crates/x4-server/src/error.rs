//! Error types for the hub API.
//!
//! [`HubError`] covers every request-level failure and converts into an
//! Axum response via [`IntoResponse`]. The state manager itself never
//! fails; these errors are produced only while parsing requests or
//! looking up absent resources.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// Errors that can occur in the hub API layer.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The request body is not JSON.
    #[error("Failed to parse request body")]
    MalformedBody,

    /// The body is JSON but does not match the expected shape or rules.
    #[error("{message}")]
    InvalidPayload {
        /// Short description, e.g. `Invalid stations data`.
        message: String,
        /// Structured issues: shape errors or field validation errors.
        details: Value,
    },

    /// The requested singleton or entity is not stored.
    #[error("{0}")]
    NotFound(String),

    /// A response value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HubError {
    /// Shorthand for [`HubError::NotFound`].
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_owned())
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MalformedBody => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            Self::InvalidPayload { message, details } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "details": details }),
            ),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            Self::Serialization(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("JSON error: {e}") }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
