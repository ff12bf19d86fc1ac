//! Error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use redacta_core::Error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
    /// Trace ID.
    pub trace_id: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>, trace_id: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.into(),
                trace_id: trace_id.to_string(),
            },
        }
    }

    /// Map a pipeline error. Validation failures are the caller's fault.
    pub fn from_error(err: &Error, trace_id: &str) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!(trace_id = %trace_id, error = %err, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.code(), err.to_string(), trace_id)
    }

    /// Undecodable request bodies are validation failures too.
    pub fn from_rejection(rejection: &JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            rejection.body_text(),
            &Uuid::new_v4().to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
