//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (both sheets loaded)
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
/// Returns 200 once both sheets hold rows. A sheet whose last refresh
/// failed makes the service unready until a refresh succeeds.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.store.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with per-sheet state.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sheets = state.store.status().await;
    let ready = sheets.iter().filter(|s| s.state == "ready").count();

    let overall_status = if ready == sheets.len() {
        "healthy"
    } else if ready > 0 {
        "degraded"
    } else {
        "unhealthy"
    };

    let state_of = |index: usize| {
        sheets
            .get(index)
            .map(|s| s.state.clone())
            .unwrap_or_default()
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        transactions: state_of(0),
        revenue: state_of(1),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
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
