//! Background sheet refresh
//!
//! Each sheet is refreshed on its own ticker so a slow or failing sheet never
//! holds back the other one.

use super::{RowSource, SheetKind, SheetStore, SourceStatus};
use crate::config::RefreshConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Fetches sheets from a row source into a store
pub struct SheetRefresher {
    source: Arc<dyn RowSource>,
    store: Arc<SheetStore>,
    config: RefreshConfig,
}

impl SheetRefresher {
    pub fn new(source: Arc<dyn RowSource>, store: Arc<SheetStore>, config: RefreshConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SheetStore> {
        &self.store
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.config.interval_secs.max(1))
    }

    /// Fetch one sheet and record the outcome
    pub async fn refresh(&self, kind: SheetKind) {
        tracing::debug!(sheet = %kind, source = self.source.name(), "Refreshing sheet");
        match kind {
            SheetKind::Transactions => {
                let result = self.source.fetch_transactions().await;
                self.store.set_transactions(result).await;
            }
            SheetKind::Revenue => {
                let result = self.source.fetch_revenue().await;
                self.store.set_revenue(result).await;
            }
        }
    }

    /// Fetch both sheets concurrently and return their new status
    pub async fn refresh_all(&self) -> Vec<SourceStatus> {
        futures_util::future::join(
            self.refresh(SheetKind::Transactions),
            self.refresh(SheetKind::Revenue),
        )
        .await;
        self.store.status().await
    }

    /// Start one refresh task per sheet
    ///
    /// The first tick fires immediately, so the store leaves its loading
    /// state as soon as each fetch completes.
    pub fn start_background_refresh(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        if !self.config.enabled {
            tracing::info!("Background refresh disabled");
            return Vec::new();
        }

        tracing::info!(
            interval_secs = self.interval().as_secs(),
            source = self.source.name(),
            "Starting background sheet refresh"
        );

        SheetKind::all()
            .iter()
            .map(|&kind| {
                let refresher = Arc::clone(&self);
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(refresher.interval());
                    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

                    loop {
                        ticker.tick().await;
                        refresher.refresh(kind).await;
                    }
                })
            })
            .collect()
    }
}
