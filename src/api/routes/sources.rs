//! Source Routes
//!
//! Endpoints for inspecting and refreshing the sheets.
//!
//! - GET /api/v1/sources - Status of each sheet
//! - POST /api/v1/sources/refresh - Refresh both sheets now
//! - POST /api/v1/sources/:sheet/refresh - Refresh one sheet now

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{RefreshResponse, SourceListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::sheets::{SheetKind, SheetRefresher, SourceStatus};

/// GET /api/v1/sources
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<SourceListResponse> {
    Json(SourceListResponse {
        source: state
            .refresher
            .as_ref()
            .map(|r| r.source_name().to_string()),
        sheets: state.store.status().await,
    })
}

/// POST /api/v1/sources/refresh
///
/// Fetches both sheets and waits for the result. A failed fetch is reported
/// in the body, not as an error status.
pub async fn refresh_all(State(state): State<Arc<AppState>>) -> ApiResult<Json<RefreshResponse>> {
    let refresher = refresher(&state)?;
    let start = std::time::Instant::now();

    let sheets = refresher.refresh_all().await;

    tracing::info!(
        duration_ms = start.elapsed().as_millis() as u64,
        "Manual refresh completed"
    );
    Ok(Json(refresh_response(sheets, start)))
}

/// POST /api/v1/sources/:sheet/refresh
pub async fn refresh_one(
    State(state): State<Arc<AppState>>,
    Path(sheet): Path<String>,
) -> ApiResult<Json<RefreshResponse>> {
    let kind: SheetKind = sheet.parse().map_err(ApiError::NotFound)?;
    let refresher = refresher(&state)?;
    let start = std::time::Instant::now();

    refresher.refresh(kind).await;

    let sheets = state
        .store
        .status()
        .await
        .into_iter()
        .filter(|s| s.sheet == kind)
        .collect();
    Ok(Json(refresh_response(sheets, start)))
}

fn refresher(state: &AppState) -> ApiResult<&Arc<SheetRefresher>> {
    state
        .refresher
        .as_ref()
        .ok_or_else(|| ApiError::Validation("No row source configured".to_string()))
}

fn refresh_response(sheets: Vec<SourceStatus>, start: std::time::Instant) -> RefreshResponse {
    let status = if sheets.iter().all(|s| s.state == "ready") {
        "success"
    } else {
        "failed"
    };

    RefreshResponse {
        status: status.to_string(),
        duration_ms: start.elapsed().as_millis() as u64,
        sheets,
    }
}
