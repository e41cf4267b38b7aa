//! Liveness probe: GET /memory/health

use axum::{extract::State, response::Json};
use memhunt_core::MemoryReporter;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    total_objects: u64,
    message: &'static str,
}

/// GET /memory/health - Enumerate live objects and report the count.
///
/// This is the one route where a backend failure becomes an HTTP error
/// status instead of an error payload.
pub async fn memory_health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let total_objects = state.report(MemoryReporter::probe_liveness).await??;

    Ok(Json(HealthResponse {
        status: "healthy",
        total_objects,
        message: "Memory monitoring is operational",
    }))
}
