//! Handler errors and their JSON bodies.
//!
//! Only two things can go wrong at the HTTP layer: the liveness probe fails,
//! or something unexpected escapes the reporter. Backend failures never get
//! here; the reporter already turned them into payloads.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use memhunt_core::ErrorKind;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, AppError>;

/// Fixed detail returned when the health probe fails.
pub const LIVENESS_FAILURE_DETAIL: &str = "Memory monitoring failed";

/// Message of every catch-all response.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Detail of a catch-all response outside debug mode.
pub const REDACTED_DETAIL: &str = "Contact administrator";

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Liveness failure: {0}")]
    Liveness(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Internal error for a failure outside the reporter's contract.
    pub fn internal(reason: impl Into<String>) -> Self {
        memhunt_core::Error::facade_failure(reason).into()
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Liveness(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<memhunt_core::Error> for AppError {
    fn from(err: memhunt_core::Error) -> Self {
        match err.kind() {
            ErrorKind::LivenessFailure => Self::Liveness(err.to_string()),
            ErrorKind::BackendFailure
            | ErrorKind::EmptyResult
            | ErrorKind::FacadeFailure
            | ErrorKind::Config => Self::Internal(err.to_string()),
        }
    }
}

/// Body of a failed health check.
#[derive(Debug, Serialize)]
pub struct LivenessErrorBody {
    pub detail: &'static str,
}

/// Body of a catch-all failure.
#[derive(Debug, Serialize)]
pub struct InternalErrorBody {
    pub status: &'static str,
    pub message: &'static str,
    pub detail: String,
}

impl InternalErrorBody {
    /// Generic body; `detail` is only passed through in debug mode.
    #[must_use]
    pub fn new(detail: Option<&str>) -> Self {
        Self {
            status: "error",
            message: INTERNAL_ERROR_MESSAGE,
            detail: detail.unwrap_or(REDACTED_DETAIL).to_string(),
        }
    }
}

/// Internal error text riding on a catch-all response, for the middleware
/// to log and optionally expose.
#[derive(Debug, Clone)]
pub struct FailureDetail(pub String);

/// Generic 500 carrying `detail` as a response extension.
#[must_use]
pub fn internal_error_response(detail: String) -> Response {
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(InternalErrorBody::new(None)),
    )
        .into_response();
    response.extensions_mut().insert(FailureDetail(detail));
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Liveness(_) => (
                self.status_code(),
                Json(LivenessErrorBody {
                    detail: LIVENESS_FAILURE_DETAIL,
                }),
            )
                .into_response(),
            Self::Internal(reason) => internal_error_response(reason),
        }
    }
}
