//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::ApiConfig;
use crate::sheets::{SheetRefresher, SheetStore};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Latest rows of both sheets
    pub store: Arc<SheetStore>,
    /// Refresher for manual refresh (optional)
    pub refresher: Option<Arc<SheetRefresher>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState over a store that is filled elsewhere
    pub fn new(store: Arc<SheetStore>, config: ApiConfig) -> Self {
        Self {
            store,
            refresher: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Create AppState backed by a refresher and its store
    pub fn with_refresher(refresher: Arc<SheetRefresher>, config: ApiConfig) -> Self {
        Self {
            store: Arc::clone(refresher.store()),
            refresher: Some(refresher),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
