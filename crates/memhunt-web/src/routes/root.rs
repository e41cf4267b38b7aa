//! Capability listing: GET /

use std::collections::BTreeMap;

use axum::response::Json;
use serde::Serialize;

use super::ROUTES;

/// Response of `GET /`.
#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    message: &'static str,
    version: &'static str,
    endpoints: BTreeMap<&'static str, &'static str>,
}

fn build_capabilities() -> CapabilitiesResponse {
    CapabilitiesResponse {
        message: "Welcome to memhunt",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ROUTES
            .iter()
            .filter(|(path, _)| *path != "/")
            .copied()
            .collect(),
    }
}

/// GET / - Static capability listing
pub async fn capabilities() -> Json<CapabilitiesResponse> {
    Json(build_capabilities())
}
