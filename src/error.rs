//! Unified error types for the webhook service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::metrics;
use crate::provider::response::{ErrorDetail, ErrorResponse};

/// Error code returned in the body when a request payload cannot be used.
pub const INVALID_REQUEST_CONTENT: &str = "InvalidRequestContent";

/// Unified error type for the webhook service.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// Request body is not a JSON resource.
    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    /// `internalMetadata` is present but not a JSON object.
    #[error("internalMetadata must be an object, found {found}")]
    InvalidInternalMetadata {
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebhookError {
    /// Whether the error was caused by the caller's payload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WebhookError::MalformedBody(_) | WebhookError::InvalidInternalMetadata { .. }
        )
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            metrics::inc_malformed_bodies();
            tracing::warn!(error = %self, "rejecting request body");
            let body = ErrorResponse::failed(ErrorDetail::new(
                INVALID_REQUEST_CONTENT,
                self.to_string(),
            ));
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }

        tracing::error!(error = %self, "request failed");
        let body = ErrorResponse::failed(ErrorDetail::new("InternalError", self.to_string()));
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, WebhookError>;
