//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Ready once every dataset has a cached map. The context is built before
/// the server binds, so this only fails on an empty catalog.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if maps_ready(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ctx = &state.context;
    let status = if maps_ready(&state) { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        datasets: ctx.catalog().len(),
        maps: ctx.map_count(),
        boundary_features: ctx.geo().feature_count(),
        active_sessions: state.session_count(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn maps_ready(state: &AppState) -> bool {
    let ctx = &state.context;
    !ctx.catalog().is_empty() && ctx.map_count() == ctx.catalog().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
