//! Sheetboard REST API
//!
//! HTTP API layer for Sheetboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard` - Every view for a filter
//! - `GET /api/v1/balances/daily` - Running balance per date
//! - `GET /api/v1/balances/monthly` - Last running balance per month
//! - `GET /api/v1/monthly` - Monthly inflow, outflow and revenue
//! - `GET /api/v1/periods` - Selectable months and quarters
//! - `GET /api/v1/expenses` - Expense per calendar month
//! - `GET /api/v1/summary` - Totals for the selected period
//!
//! ## Sources
//! - `GET /api/v1/sources` - Sheet status
//! - `POST /api/v1/sources/refresh` - Refresh both sheets
//! - `POST /api/v1/sources/:sheet/refresh` - Refresh one sheet
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetboard::api::{serve, AppState};
//! use sheetboard::config::Config;
//! use sheetboard::sheets::{SheetRefresher, SheetStore, SheetsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let client = Arc::new(SheetsClient::new(config.sheets.clone())?);
//!     let store = Arc::new(SheetStore::new());
//!     let refresher = Arc::new(SheetRefresher::new(client, store, config.refresh.clone()));
//!
//!     Arc::clone(&refresher).start_background_refresh();
//!     let state = AppState::with_refresher(refresher, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ApiConfig;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Dashboard routes
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/balances/daily", get(routes::dashboard::get_daily_balances))
        .route("/balances/monthly", get(routes::dashboard::get_monthly_balances))
        .route("/monthly", get(routes::dashboard::get_monthly_aggregates))
        .route("/periods", get(routes::dashboard::get_period_options))
        .route("/expenses", get(routes::dashboard::get_expenses))
        .route("/summary", get(routes::dashboard::get_summary))
        // Source routes
        .route("/sources", get(routes::sources::list_sources))
        .route("/sources/refresh", post(routes::sources::refresh_all))
        .route("/sources/:sheet/refresh", post(routes::sources::refresh_one));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let timeout = Duration::from_secs(state.config.request_timeout_secs.max(1));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Allow the configured origins, or any origin when none are configured
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sheetboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sheetboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefreshConfig;
    use crate::ledger::{RevenueRow, TransactionRow};
    use crate::sheets::{FileSource, SheetError, SheetRefresher, SheetStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn transactions() -> Vec<TransactionRow> {
        vec![
            TransactionRow::new("2024", "1", "5").inflow("1,000"),
            TransactionRow::new("2024", "1", "20").outflow("300"),
            TransactionRow::new("2024", "4", "2").inflow("500"),
        ]
    }

    async fn loaded_store() -> Arc<SheetStore> {
        let store = Arc::new(SheetStore::new());
        store.set_transactions(Ok(transactions())).await;
        store
            .set_revenue(Ok(vec![RevenueRow::new("2024-01-31", "2,000")]))
            .await;
        store
    }

    fn app(store: Arc<SheetStore>) -> Router {
        build_router(AppState::new(store, ApiConfig::default()))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(app: Router, uri: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = get(app(Arc::new(SheetStore::new())), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_waits_for_sheets() {
        let response = get(app(Arc::new(SheetStore::new())), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = get(app(loaded_store().await), "/health/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let store = Arc::new(SheetStore::new());
        store.set_transactions(Ok(transactions())).await;

        let response = get(app(store), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["transactions"], "ready");
        assert_eq!(body["revenue"], "loading");
    }

    #[tokio::test]
    async fn test_dashboard_while_loading() {
        let response = get(app(Arc::new(SheetStore::new())), "/api/v1/dashboard").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json(response).await;
        assert_eq!(body["error"]["code"], "SOURCE_LOADING");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_dashboard_with_failed_sheet() {
        let store = Arc::new(SheetStore::new());
        store.set_transactions(Ok(transactions())).await;
        store.set_revenue(Err(SheetError::Unavailable)).await;

        let response = get(app(store), "/api/v1/monthly").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json(response).await["error"]["code"], "SOURCE_FAILED");
    }

    #[tokio::test]
    async fn test_dashboard() {
        let response = get(app(loaded_store().await), "/api/v1/dashboard").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["daily_balances"].as_array().unwrap().len(), 3);
        assert_eq!(body["monthly_aggregates"][0]["period_key"], "2024-01");
        assert_eq!(body["monthly_aggregates"][0]["revenue"], 2000);
        assert_eq!(body["period_options"]["quarters"][1], "2024-Q2");
        assert_eq!(body["summary"]["net_balance"], 1200);
        assert_eq!(body["filter"]["department"], "all");
    }

    #[tokio::test]
    async fn test_dashboard_quarter_filter() {
        let response = get(
            app(loaded_store().await),
            "/api/v1/dashboard?granularity=quarter&period=2024-Q1&project=alpha",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["summary"]["transaction_count"], 2);
        assert_eq!(body["summary"]["net_balance"], 700);
        assert_eq!(body["filter"]["project"], "alpha");
    }

    #[tokio::test]
    async fn test_invalid_granularity() {
        let response = get(app(loaded_store().await), "/api/v1/summary?granularity=weekly").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_series_endpoints() {
        let store = loaded_store().await;

        let body = json(get(app(store.clone()), "/api/v1/balances/daily").await).await;
        assert_eq!(body["closing_balance"], 1200);

        let body = json(get(app(store.clone()), "/api/v1/balances/monthly").await).await;
        assert_eq!(body["points"][0]["month"], "2024-01");
        assert_eq!(body["points"][0]["balance"], 700);

        let body = json(get(app(store.clone()), "/api/v1/expenses").await).await;
        assert_eq!(body["months"].as_array().unwrap().len(), 12);
        assert_eq!(body["total"], 300);

        let body = json(get(app(store.clone()), "/api/v1/periods").await).await;
        assert_eq!(body["months"], serde_json::json!(["2024-01", "2024-04"]));

        let body = json(get(app(store), "/api/v1/summary?period=2024-04").await).await;
        assert_eq!(body["summary"]["total_inflow"], 500);
    }

    #[tokio::test]
    async fn test_sources_status() {
        let body = json(get(app(loaded_store().await), "/api/v1/sources").await).await;

        assert!(body.get("source").is_none());
        assert_eq!(body["sheets"][0]["sheet"], "transactions");
        assert_eq!(body["sheets"][0]["rows"], 3);
        assert_eq!(body["sheets"][1]["state"], "ready");
    }

    #[tokio::test]
    async fn test_refresh_without_source() {
        let response = post(app(loaded_store().await), "/api/v1/sources/refresh").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_from_files() {
        let dir = tempdir().unwrap();
        let tx_path = dir.path().join("tx.csv");
        std::fs::write(&tx_path, "년,월,일,입금,출금\n2024,2,1,800,\n").unwrap();

        let refresher = Arc::new(SheetRefresher::new(
            Arc::new(FileSource::new(&tx_path, None)),
            Arc::new(SheetStore::new()),
            RefreshConfig::default(),
        ));
        let router = build_router(AppState::with_refresher(refresher, ApiConfig::default()));

        let response = post(router.clone(), "/api/v1/sources/refresh").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "success");

        let body = json(get(router.clone(), "/api/v1/balances/daily").await).await;
        assert_eq!(body["closing_balance"], 800);

        let response = post(router.clone(), "/api/v1/sources/revenue/refresh").await;
        let body = json(response).await;
        assert_eq!(body["sheets"].as_array().unwrap().len(), 1);

        let response = post(router, "/api/v1/sources/ledger/refresh").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
