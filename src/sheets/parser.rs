//! Sheet CSV parsing
//!
//! The first line of an export is the header. Header names map to row fields
//! verbatim, so the Korean column names (and their spaced variants) select
//! the fields. Columns the row type does not know are ignored; known columns
//! that are absent read as empty strings.

use super::{SheetError, SheetKind, SheetResult};
use crate::ledger::{RevenueRow, TransactionRow};
use serde::de::DeserializeOwned;

/// Columns the transaction sheet must carry for aggregation to mean anything
pub const TRANSACTION_COLUMNS: &[&str] = &["년", "월", "일", "입금", "출금"];

/// Columns the revenue sheet must carry
pub const REVENUE_COLUMNS: &[&str] = &["날짜", "매출액"];

/// Parse a transaction sheet export
pub fn parse_transactions(text: &str) -> SheetResult<Vec<TransactionRow>> {
    parse_sheet(SheetKind::Transactions, text, TRANSACTION_COLUMNS)
}

/// Parse a revenue sheet export
pub fn parse_revenue(text: &str) -> SheetResult<Vec<RevenueRow>> {
    parse_sheet(SheetKind::Revenue, text, REVENUE_COLUMNS)
}

/// Parse CSV text into typed rows, all or nothing
fn parse_sheet<T: DeserializeOwned>(
    kind: SheetKind,
    text: &str,
    required: &[&str],
) -> SheetResult<Vec<T>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| parse_error(kind, &e))?
        .clone();

    if let Some(column) = required
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(SheetError::MissingColumn {
            kind,
            column: column.to_string(),
        });
    }

    let rows = reader
        .deserialize::<T>()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|e| parse_error(kind, &e))?;

    tracing::debug!(sheet = %kind, rows = rows.len(), "Parsed sheet export");
    Ok(rows)
}

fn parse_error(kind: SheetKind, err: &csv::Error) -> SheetError {
    SheetError::Parse {
        kind,
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}
