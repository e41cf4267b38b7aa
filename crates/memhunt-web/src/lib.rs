//! memhunt web server
//!
//! HTTP facade over the memory reporter, with tower middleware for CORS,
//! tracing, compression and panic recovery.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use axum::{Router, middleware::from_fn_with_state};
use memhunt_core::MemoryReporter;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer,
};
use tracing::info;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::AppError;
pub use state::AppState;

/// Build the full application: route table, state and middleware.
///
/// # Errors
///
/// Returns an error if the CORS origin is not a valid header value.
pub fn create_router(config: ServerConfig, reporter: MemoryReporter) -> Result<Router, Error> {
    let state = AppState::new(config, reporter);
    with_middleware(routes::create_router(), state)
}

/// Apply state and the middleware stack to `routes`.
///
/// The catch-all sits outside the panic layer so it sees panic responses too.
///
/// # Errors
///
/// Returns an error if the CORS origin is not a valid header value.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Result<Router, Error> {
    info!("Creating router with CORS origin: {}", state.config.cors_origin);

    let cors = middleware::cors_layer(&state.config.cors_origin)?;

    let router = routes
        .layer(CatchPanicLayer::custom(middleware::panic_response))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::catch_all_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state);

    Ok(router)
}

/// Web server errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid header value
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] ::axum::http::header::InvalidHeaderValue),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] ::axum::http::Error),

    /// Axum error
    #[error("Axum error: {0}")]
    Axum(#[from] axum::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] memhunt_core::Error),
}

impl From<std::convert::Infallible> for Error {
    fn from(value: std::convert::Infallible) -> Self {
        match value {}
    }
}
