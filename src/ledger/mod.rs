//! Sheetboard Ledger
//!
//! The aggregation core: typed sheet rows in, dashboard series out.
//!
//! - **types**: Row records, derived series and the dashboard filter
//! - **amount**: Lenient amount text parsing
//! - **period**: Period keys and chronological ordering
//! - **aggregate**: Running balances, monthly buckets, period filtering
//! - **snapshot**: The whole pipeline for one filter
//!
//! # Example
//!
//! ```rust
//! use sheetboard::ledger::{DashboardFilter, DashboardSnapshot, RevenueRow, TransactionRow};
//!
//! let transactions = vec![
//!     TransactionRow::new("2024", "1", "3").inflow("1,000"),
//!     TransactionRow::new("2024", "1", "9").outflow("500"),
//! ];
//! let revenue = vec![RevenueRow::new("2024-01-31", "7,000")];
//!
//! let snapshot = DashboardSnapshot::build(&transactions, &revenue, &DashboardFilter::default());
//! assert_eq!(snapshot.closing_balance(), 500);
//! assert_eq!(snapshot.monthly_aggregates[0].revenue, Some(7000));
//! ```

pub mod aggregate;
pub mod amount;
pub mod period;
pub mod snapshot;
pub mod types;

pub use aggregate::{
    daily_balances, filter_rows, monthly_aggregates, monthly_balances, monthly_expenses,
    period_options, period_summary, summarize, total_expense,
};
pub use amount::parse_amount;
pub use period::{month_key, quarter_key, sort_chronologically};
pub use snapshot::DashboardSnapshot;
pub use types::{
    DailyBalancePoint, DashboardFilter, Granularity, MonthlyAggregate, MonthlyBalancePoint,
    MonthlyExpense, PeriodFilterSummary, PeriodOptions, RevenueRow, TransactionRow,
};
