//! # Sheetboard
//!
//! Spreadsheet-backed financial dashboard. Reads a transaction ledger sheet
//! and a revenue sheet, derives running balances and monthly or quarterly
//! summaries, and serves them as JSON.
//!
//! ## Modules
//!
//! - [`ledger`]: Row types and the aggregation pipeline
//! - [`sheets`]: Row sources, the sheet store and background refresh
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sheetboard::ledger::DashboardFilter;
//! use sheetboard::sheets::{FileSource, RowSource};
//! use sheetboard::DashboardSnapshot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = FileSource::new("거래내역.csv", Some("매출.csv".into()));
//!
//!     let transactions = source.fetch_transactions().await?;
//!     let revenue = source.fetch_revenue().await?;
//!
//!     let snapshot = DashboardSnapshot::build(&transactions, &revenue, &DashboardFilter::default());
//!     println!("Closing balance: {}", snapshot.closing_balance());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod ledger;
pub mod sheets;

// Re-export top-level types for convenience
pub use ledger::{
    DailyBalancePoint, DashboardFilter, DashboardSnapshot, Granularity, MonthlyAggregate,
    MonthlyBalancePoint, MonthlyExpense, PeriodFilterSummary, PeriodOptions, RevenueRow,
    TransactionRow,
};

pub use sheets::{
    FileSource, RowSource, SheetError, SheetKind, SheetRefresher, SheetResult, SheetStore,
    SheetsClient, SourceStatus,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{
    ApiConfig, Config, ConfigError, LoggingConfig, RefreshConfig, SheetsConfig, SourceMode,
};
