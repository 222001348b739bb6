//! Sheetboard API Server
//!
//! Run with: cargo run --bin sheetboard-api
//!
//! # Configuration
//!
//! Settings come from the first config file found (see `Config::load_default`)
//! or the path in `SHEETBOARD_CONFIG`, then environment overrides:
//! - `SHEETBOARD_SPREADSHEET_ID`: Spreadsheet to read (required)
//! - `SHEETBOARD_API_KEY`: API key for values_api mode
//! - `SHEETBOARD_SOURCE_MODE`: csv_export (default) or values_api
//! - `SHEETBOARD_REFRESH_SECS`: Seconds between refreshes (default: 30)
//! - `SHEETBOARD_API_HOST` / `SHEETBOARD_API_PORT`: Bind address (default: 0.0.0.0:8082)
//! - `SHEETBOARD_LOG_LEVEL` / `SHEETBOARD_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Full filter directive, overrides the log level

use sheetboard::api::{serve, AppState};
use sheetboard::config::{Config, LoggingConfig};
use sheetboard::sheets::{SheetRefresher, SheetStore, SheetsClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("SHEETBOARD_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting Sheetboard API server v{}", env!("CARGO_PKG_VERSION"));

    let client = SheetsClient::new(config.sheets.clone())?;
    tracing::info!(
        spreadsheet = %config.sheets.spreadsheet_id,
        mode = ?config.sheets.mode,
        "Spreadsheet source configured"
    );

    let store = Arc::new(SheetStore::new());
    let refresher = Arc::new(SheetRefresher::new(
        Arc::new(client),
        Arc::clone(&store),
        config.refresh.clone(),
    ));

    // Background refresh fetches immediately; without it, fetch once here
    let refresh_handles = if config.refresh.enabled {
        Arc::clone(&refresher).start_background_refresh()
    } else {
        tracing::info!("Background refresh disabled, loading sheets once");
        refresher.refresh_all().await;
        Vec::new()
    };

    let state = AppState::with_refresher(refresher, config.api.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    for handle in refresh_handles {
        handle.abort();
    }
    tracing::info!("Sheetboard API server stopped");

    Ok(())
}

/// Initialize tracing from the logging config
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sheetboard={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
