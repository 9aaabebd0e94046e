//! HTTP error mapping.
//!
//! Every error body is `{"error": "..."}`. Chat failures always carry the
//! crisis-line pointer because the student may be mid-crisis when the
//! provider is down.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::chat::ChatError;
use crate::journal::JournalError;

/// Generic chat failure text.
pub const CHAT_FAILURE_MESSAGE: &str = "Failed to process message. If you're in crisis, \
please call or text 988 (Suicide & Crisis Lifeline) for immediate support.";

/// Chat timeout text.
pub const CHAT_TIMEOUT_MESSAGE: &str = "I'm having trouble connecting right now. Please try \
again in a moment. If you're in crisis, please call or text 988 for immediate support.";

/// Seconds advertised in `Retry-After` for retryable failures.
pub const RETRY_AFTER_SECS: u64 = 5;

/// An error that renders as a JSON HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid request (400).
    #[error("{0}")]
    BadRequest(String),
    /// No such resource (404).
    #[error("{0}")]
    NotFound(String),
    /// Retryable upstream failure (503 + `Retry-After`).
    #[error("{0}")]
    Unavailable(String),
    /// Non-retryable server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for the variant.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = matches!(self, Self::Unavailable(_));
        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(RETRY_AFTER_SECS));
        }
        response
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else if err.is_retryable() {
            Self::Unavailable(CHAT_TIMEOUT_MESSAGE.to_owned())
        } else {
            Self::Internal(CHAT_FAILURE_MESSAGE.to_owned())
        }
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        if err.is_client_error() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal("Failed to access journal entries".to_owned())
        }
    }
}
