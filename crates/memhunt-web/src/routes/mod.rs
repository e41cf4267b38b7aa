//! Route table.
//!
//! - `GET /` - Capability listing
//! - `GET /memory/summary` - Per-type memory usage, top records
//! - `GET /memory/common-types` - Most common live types
//! - `GET /memory/biggest-offender` - Type using the most memory
//! - `GET /memory/debug` - All of the above plus a timestamp
//! - `GET /memory/health` - Liveness probe

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod health;
pub mod memory;
pub mod root;

/// Every route with its description, in listing order.
pub const ROUTES: &[(&str, &str)] = &[
    ("/", "API overview"),
    ("/memory/summary", "Get memory usage summary"),
    ("/memory/common-types", "Get most common object types"),
    ("/memory/biggest-offender", "Find biggest memory consumer"),
    ("/memory/debug", "Full debug information"),
    ("/memory/health", "Memory monitoring health check"),
];

/// Create the route table. State and middleware are applied by the caller.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root::capabilities))
        .route("/memory/summary", get(memory::summary))
        .route("/memory/common-types", get(memory::common_types))
        .route("/memory/biggest-offender", get(memory::biggest_offender))
        .route("/memory/debug", get(memory::debug))
        .route("/memory/health", get(health::memory_health))
}
