//! HTTP error handling for the web server.
//!
//! Core errors become plain-text responses; browsers and the toggle client
//! never look at the body, but it helps with curl.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::Error;

/// An error answered to an HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create an internal server error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Rename { .. } => {
                tracing::warn!("{}", err);
                Self::internal("rename error")
            }
            e if e.is_client_error() => Self::bad_request(e.to_string()),
            e => {
                tracing::error!("{}", e);
                Self::internal(e.to_string())
            }
        }
    }
}

/// Result type for web handlers.
pub type ApiResult<T> = Result<T, ApiError>;
