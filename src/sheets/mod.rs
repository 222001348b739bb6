//! Spreadsheet Row Sources
//!
//! This module fetches the two sheets the dashboard is built from and keeps
//! the latest copy of each:
//! - `SheetsClient`: Google Sheets over HTTP (CSV export or values API)
//! - `FileSource`: local CSV exports
//! - `SheetStore`: latest state per sheet (loading, ready, failed)
//! - `SheetRefresher`: periodic background refresh

mod client;
mod file;
pub mod parser;
mod refresher;
mod store;

pub use client::SheetsClient;
pub use file::FileSource;
pub use parser::{parse_revenue, parse_transactions};
pub use refresher::SheetRefresher;
pub use store::{SheetStore, SourceState, SourceStatus};

use crate::ledger::{RevenueRow, TransactionRow};
use async_trait::async_trait;
use serde::Serialize;

/// The two sheets the dashboard reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    /// Transaction ledger (`거래내역`)
    Transactions,
    /// Revenue sheet (`매출`)
    Revenue,
}

impl SheetKind {
    /// Get all sheet kinds for iteration
    pub fn all() -> &'static [SheetKind] {
        &[SheetKind::Transactions, SheetKind::Revenue]
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetKind::Transactions => write!(f, "transactions"),
            SheetKind::Revenue => write!(f, "revenue"),
        }
    }
}

impl std::str::FromStr for SheetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "transactions" | "거래내역" => Ok(SheetKind::Transactions),
            "revenue" | "매출" => Ok(SheetKind::Revenue),
            _ => Err(format!("Unknown sheet: {}", s)),
        }
    }
}

/// Common trait for everything that can supply sheet rows
///
/// Implementations return either the complete row set or an error, never a
/// partial list.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Short name used in logs and status output
    fn name(&self) -> &str;

    /// Fetch and parse the transaction sheet
    async fn fetch_transactions(&self) -> SheetResult<Vec<TransactionRow>>;

    /// Fetch and parse the revenue sheet
    async fn fetch_revenue(&self) -> SheetResult<Vec<RevenueRow>>;
}

/// Errors that can occur while fetching or parsing sheets
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Spreadsheet service unavailable")]
    Unavailable,

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse {kind} sheet at line {line}: {message}")]
    Parse {
        kind: SheetKind,
        line: u64,
        message: String,
    },

    #[error("{kind} sheet is missing column '{column}'")]
    MissingColumn { kind: SheetKind, column: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} sheet is still loading")]
    Loading(SheetKind),

    #[error("{kind} sheet failed to load: {message}")]
    Failed { kind: SheetKind, message: String },
}

/// Result type for sheet operations
pub type SheetResult<T> = Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SheetError::Loading(SheetKind::Revenue);
        assert_eq!(err.to_string(), "revenue sheet is still loading");

        let err = SheetError::MissingColumn {
            kind: SheetKind::Transactions,
            column: "입금".to_string(),
        };
        assert_eq!(err.to_string(), "transactions sheet is missing column '입금'");
    }

    #[test]
    fn test_sheet_kind_from_str() {
        assert_eq!("Revenue".parse::<SheetKind>(), Ok(SheetKind::Revenue));
        assert_eq!("거래내역".parse::<SheetKind>(), Ok(SheetKind::Transactions));
        assert!("ledger".parse::<SheetKind>().is_err());
    }
}
