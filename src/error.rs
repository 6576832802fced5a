//! Structured error reporting shared by services and routes.
//!
//! DESIGN
//! ======
//! Service modules define their own `thiserror` enums and implement
//! `ErrorCode` so every failure carries a grepable code and a retryable
//! flag. Routes convert those into `ApiError`, which renders as
//! `{ "code", "message", "retryable" }` with a matching HTTP status.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON error body returned by every API route.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    /// Build from a typed error and the status the route chose for it.
    pub fn from_code(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        if status.is_server_error() {
            tracing::error!(code = err.error_code(), error = %err, "request failed");
        } else {
            tracing::warn!(code = err.error_code(), error = %err, status = status.as_u16(), "request rejected");
        }
        Self {
            status,
            body: ErrorBody { code: err.error_code(), message: err.to_string(), retryable: err.retryable() },
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody { code: "E_UNAUTHORIZED", message: message.into(), retryable: false },
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody { code: "E_BAD_REQUEST", message: message.into(), retryable: false },
        }
    }

    /// Malformed path, query or body, keeping the status axum chose.
    #[must_use]
    pub fn invalid_request(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(status = status.as_u16(), error = %message, "request rejected by extractor");
        Self { status, body: ErrorBody { code: "E_INVALID_REQUEST", message, retryable: false } }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::invalid_request(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_request(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
