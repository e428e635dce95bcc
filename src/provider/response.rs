//! Response envelopes.
//!
//! The calling platform reads outcomes from the body, not the transport
//! status, so every webhook answer carries an explicit status code and one of
//! a fixed set of bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::resource::Resource;

/// Status string reported for a rejected operation.
pub const STATUS_FAILED: &str = "Failed";

/// Error code and human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Message shown to the end user.
    pub message: String,
}

impl ErrorDetail {
    /// Build an error detail.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Body returned when a lifecycle operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub error: ErrorDetail,
    /// Always `Failed`.
    pub status: String,
}

impl ErrorResponse {
    /// Wrap an error detail with the `Failed` status.
    pub fn failed(error: ErrorDetail) -> Self {
        Self {
            error,
            status: STATUS_FAILED.to_string(),
        }
    }
}

/// Body variants a webhook may answer with.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Zero-length body.
    Empty,
    /// Refusal.
    Error(ErrorResponse),
    /// The (possibly mutated) resource.
    Resource(Resource),
}

/// Status code plus body, independent of the transport outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    /// HTTP status to send.
    pub status_code: StatusCode,
    /// Body to send.
    pub body: ResponseBody,
}

impl WebhookResponse {
    /// 200 with an empty body.
    pub fn ok_empty() -> Self {
        Self {
            status_code: StatusCode::OK,
            body: ResponseBody::Empty,
        }
    }

    /// 200 with a refusal in the body.
    pub fn ok_error(error: ErrorDetail) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: ResponseBody::Error(ErrorResponse::failed(error)),
        }
    }

    /// 200 with the resource in the body.
    pub fn ok_resource(resource: Resource) -> Self {
        Self {
            status_code: StatusCode::OK,
            body: ResponseBody::Resource(resource),
        }
    }

    /// Whether the body reports a refusal.
    pub fn is_failure(&self) -> bool {
        matches!(self.body, ResponseBody::Error(_))
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::Empty => (self.status_code, String::new()).into_response(),
            ResponseBody::Error(error) => (self.status_code, Json(error)).into_response(),
            ResponseBody::Resource(resource) => (self.status_code, Json(resource)).into_response(),
        }
    }
}
