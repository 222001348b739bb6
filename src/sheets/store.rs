//! Sheet Store
//!
//! Holds the latest fetch result for each sheet. Each refresh replaces the
//! previous value wholesale: the last completed fetch wins.

use super::{SheetError, SheetKind, SheetResult};
use crate::ledger::{DashboardFilter, DashboardSnapshot, RevenueRow, TransactionRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State of one sheet
#[derive(Debug, Clone)]
pub enum SourceState<T> {
    /// No fetch has completed yet
    Loading,
    /// Last fetch succeeded
    Ready {
        rows: Arc<Vec<T>>,
        refreshed_at: DateTime<Utc>,
    },
    /// Last fetch failed
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl<T> SourceState<T> {
    fn from_result(result: SheetResult<Vec<T>>) -> Self {
        match result {
            Ok(rows) => SourceState::Ready {
                rows: Arc::new(rows),
                refreshed_at: Utc::now(),
            },
            Err(e) => SourceState::Failed {
                error: e.to_string(),
                failed_at: Utc::now(),
            },
        }
    }

    fn is_loading(&self) -> bool {
        matches!(self, SourceState::Loading)
    }

    fn rows(&self, kind: SheetKind) -> SheetResult<Arc<Vec<T>>> {
        match self {
            SourceState::Loading => Err(SheetError::Loading(kind)),
            SourceState::Ready { rows, .. } => Ok(Arc::clone(rows)),
            SourceState::Failed { error, .. } => Err(SheetError::Failed {
                kind,
                message: error.clone(),
            }),
        }
    }

    fn status(&self, sheet: SheetKind) -> SourceStatus {
        match self {
            SourceState::Loading => SourceStatus {
                sheet,
                state: "loading".to_string(),
                rows: None,
                updated_at: None,
                error: None,
            },
            SourceState::Ready { rows, refreshed_at } => SourceStatus {
                sheet,
                state: "ready".to_string(),
                rows: Some(rows.len()),
                updated_at: Some(*refreshed_at),
                error: None,
            },
            SourceState::Failed { error, failed_at } => SourceStatus {
                sheet,
                state: "failed".to_string(),
                rows: None,
                updated_at: Some(*failed_at),
                error: Some(error.clone()),
            },
        }
    }
}

/// Current status of a sheet, as reported to clients
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub sheet: SheetKind,
    /// "loading", "ready" or "failed"
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// When the state last changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Latest rows of both sheets
pub struct SheetStore {
    transactions: RwLock<SourceState<TransactionRow>>,
    revenue: RwLock<SourceState<RevenueRow>>,
}

impl SheetStore {
    /// Create a store with both sheets loading
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(SourceState::Loading),
            revenue: RwLock::new(SourceState::Loading),
        }
    }

    /// Record the outcome of a transaction sheet fetch
    pub async fn set_transactions(&self, result: SheetResult<Vec<TransactionRow>>) {
        log_result(SheetKind::Transactions, &result);
        *self.transactions.write().await = SourceState::from_result(result);
    }

    /// Record the outcome of a revenue sheet fetch
    pub async fn set_revenue(&self, result: SheetResult<Vec<RevenueRow>>) {
        log_result(SheetKind::Revenue, &result);
        *self.revenue.write().await = SourceState::from_result(result);
    }

    /// Latest transaction rows
    pub async fn transactions(&self) -> SheetResult<Arc<Vec<TransactionRow>>> {
        self.transactions.read().await.rows(SheetKind::Transactions)
    }

    /// Latest revenue rows
    pub async fn revenue(&self) -> SheetResult<Arc<Vec<RevenueRow>>> {
        self.revenue.read().await.rows(SheetKind::Revenue)
    }

    /// Both row sets, or the reason they are not available
    ///
    /// A sheet that is still loading takes precedence over one that failed.
    pub async fn rows(&self) -> SheetResult<(Arc<Vec<TransactionRow>>, Arc<Vec<RevenueRow>>)> {
        let transactions = self.transactions.read().await;
        let revenue = self.revenue.read().await;

        if transactions.is_loading() {
            return Err(SheetError::Loading(SheetKind::Transactions));
        }
        if revenue.is_loading() {
            return Err(SheetError::Loading(SheetKind::Revenue));
        }

        Ok((
            transactions.rows(SheetKind::Transactions)?,
            revenue.rows(SheetKind::Revenue)?,
        ))
    }

    /// Build the dashboard for a filter from the latest rows
    ///
    /// Nothing is aggregated unless both sheets are ready.
    pub async fn snapshot(&self, filter: &DashboardFilter) -> SheetResult<DashboardSnapshot> {
        let (transactions, revenue) = self.rows().await?;
        Ok(DashboardSnapshot::build(&transactions, &revenue, filter))
    }

    /// Status of every sheet
    pub async fn status(&self) -> Vec<SourceStatus> {
        vec![
            self.transactions.read().await.status(SheetKind::Transactions),
            self.revenue.read().await.status(SheetKind::Revenue),
        ]
    }

    /// Whether both sheets hold rows
    pub async fn is_ready(&self) -> bool {
        self.rows().await.is_ok()
    }
}

impl Default for SheetStore {
    fn default() -> Self {
        Self::new()
    }
}

fn log_result<T>(kind: SheetKind, result: &SheetResult<Vec<T>>) {
    match result {
        Ok(rows) => tracing::info!(sheet = %kind, rows = rows.len(), "Sheet refreshed"),
        Err(e) => tracing::error!(sheet = %kind, error = %e, "Sheet refresh failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transactions() -> Vec<TransactionRow> {
        vec![
            TransactionRow::new("2024", "1", "3").inflow("1,000"),
            TransactionRow::new("2024", "2", "1").outflow("400"),
        ]
    }

    #[tokio::test]
    async fn test_new_store_is_loading() {
        let store = SheetStore::new();

        assert!(!store.is_ready().await);
        assert!(matches!(
            store.snapshot(&DashboardFilter::default()).await,
            Err(SheetError::Loading(SheetKind::Transactions))
        ));
    }

    #[tokio::test]
    async fn test_no_partial_aggregation_while_one_sheet_loading() {
        let store = SheetStore::new();
        store.set_transactions(Ok(transactions())).await;

        assert!(matches!(
            store.snapshot(&DashboardFilter::default()).await,
            Err(SheetError::Loading(SheetKind::Revenue))
        ));
    }

    #[tokio::test]
    async fn test_failed_sheet_blocks_snapshot() {
        let store = SheetStore::new();
        store.set_transactions(Ok(transactions())).await;
        store.set_revenue(Err(SheetError::Timeout)).await;

        let err = store.snapshot(&DashboardFilter::default()).await.unwrap_err();
        assert!(matches!(err, SheetError::Failed { kind: SheetKind::Revenue, .. }));
    }

    #[tokio::test]
    async fn test_loading_takes_precedence_over_failure() {
        let store = SheetStore::new();
        store.set_transactions(Err(SheetError::Unavailable)).await;

        assert!(matches!(
            store.rows().await,
            Err(SheetError::Loading(SheetKind::Revenue))
        ));
    }

    #[tokio::test]
    async fn test_ready_store_builds_snapshot() {
        let store = SheetStore::new();
        store.set_transactions(Ok(transactions())).await;
        store.set_revenue(Ok(vec![RevenueRow::new("2024-01-10", "5,000")])).await;

        let snapshot = store.snapshot(&DashboardFilter::default()).await.unwrap();

        assert_eq!(snapshot.closing_balance(), 600);
        assert_eq!(snapshot.monthly_aggregates[0].revenue, Some(5000));
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = SheetStore::new();
        store.set_transactions(Ok(transactions())).await;
        store.set_transactions(Err(SheetError::Timeout)).await;
        assert!(store.transactions().await.is_err());

        store.set_transactions(Ok(Vec::new())).await;
        assert!(store.transactions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_each_sheet() {
        let store = SheetStore::new();
        store.set_transactions(Ok(transactions())).await;
        store.set_revenue(Err(SheetError::Unavailable)).await;

        let status = store.status().await;

        assert_eq!(status.len(), 2);
        assert_eq!(status[0].state, "ready");
        assert_eq!(status[0].rows, Some(2));
        assert_eq!(status[1].state, "failed");
        assert_eq!(
            status[1].error.as_deref(),
            Some("Spreadsheet service unavailable")
        );
    }
}
