//! Middleware for the memhunt web server.
//!
//! - CORS handling
//! - Catch-all for internal failures and handler panics
//! - Per-request completion logging

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::ANY_ORIGIN;
use crate::error::{FailureDetail, InternalErrorBody, internal_error_response};
use crate::state::AppState;

/// CORS layer for `origin` (`*` allows any origin).
///
/// # Errors
///
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let allow_origin = if origin == ANY_ORIGIN {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::exact(origin.parse::<HeaderValue>()?)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([axum::http::Method::GET])
        .allow_headers(Any))
}

/// Request context captured before the request is handed to the next layer.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub method: axum::http::Method,
    pub uri: axum::http::Uri,
    pub start: Instant,
}

impl RequestContext {
    fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    fn log_completion(&self, status: StatusCode) {
        info!(
            method = %self.method,
            uri = %self.uri,
            duration_ms = self.elapsed().as_millis(),
            status = %status.as_u16(),
            "Request completed"
        );
    }

    fn log_client_error(&self, status: StatusCode) {
        warn!(
            method = %self.method,
            uri = %self.uri,
            status = %status.as_u16(),
            "Client error occurred"
        );
    }

    fn log_server_error(&self, status: StatusCode) {
        error!(
            method = %self.method,
            uri = %self.uri,
            status = %status.as_u16(),
            "Server error occurred"
        );
    }

    fn log_unhandled(&self, detail: &str) {
        error!(
            method = %self.method,
            path = %self.uri.path(),
            "Unhandled error in {}: {}",
            self.uri.path(),
            detail
        );
    }
}

/// Catch-all and logging middleware.
///
/// Any response carrying a [`FailureDetail`] is an internal failure: it is
/// logged with the request path, and in debug mode its body is rebuilt with
/// the internal detail. Every request is logged on completion.
pub async fn catch_all_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_request(&req);

    let response = next.run(req).await;
    let status = response.status();

    let response = match response.extensions().get::<FailureDetail>().cloned() {
        Some(FailureDetail(detail)) => {
            ctx.log_unhandled(&detail);
            if state.config.debug {
                (status, Json(InternalErrorBody::new(Some(&detail)))).into_response()
            } else {
                response
            }
        }
        None => {
            if status.is_server_error() {
                ctx.log_server_error(status);
            } else if status.is_client_error() {
                ctx.log_client_error(status);
            }
            response
        }
    };

    ctx.log_completion(status);
    response
}

/// Response for a panicking handler, used with `CatchPanicLayer::custom`.
#[must_use]
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_string());
    internal_error_response(format!("panic: {detail}"))
}
