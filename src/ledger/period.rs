//! Period keys and chronological ordering
//!
//! Keys are built from zero-padded strings so that lexicographic and
//! chronological order coincide:
//! - month: `"YYYY-MM"`
//! - quarter: `"YYYY-Q#"`
//! - date: `"YYYY-MM-DD"`

use super::types::{Granularity, TransactionRow};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date formats the revenue sheet is known to use
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y. %m. %d"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Year-month forms of a monthly revenue sheet, read as the first of the month
const MONTH_FORMATS: &[&str] = &["%Y-%m", "%Y/%m", "%Y.%m", "%Y. %m"];

/// Month key from year and month text, padding the month to two characters
pub fn month_key(year: &str, month: &str) -> String {
    format!("{}-{:0>2}", year, month)
}

/// Quarter key from year and month text
///
/// Returns `None` when the month is not an integer in 1..=12.
pub fn quarter_key(year: &str, month: &str) -> Option<String> {
    let month: u32 = month.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(format!("{}-Q{}", year, month.div_ceil(3)))
}

/// Period key of a transaction row under the given granularity
pub fn period_key(row: &TransactionRow, granularity: Granularity) -> Option<String> {
    match granularity {
        Granularity::Month => Some(month_key(&row.year, &row.month)),
        Granularity::Quarter => quarter_key(&row.year, &row.month),
    }
}

/// Zero-padded `"YYYY-MM-DD"` sort key of a transaction row
pub fn date_key(row: &TransactionRow) -> String {
    format!("{}-{:0>2}-{:0>2}", row.year, row.month, row.day)
}

/// Order rows by calendar date ascending
///
/// The sort is stable, so rows sharing a date keep their sheet order.
pub fn sort_chronologically(rows: &[TransactionRow]) -> Vec<&TransactionRow> {
    let mut sorted: Vec<&TransactionRow> = rows.iter().collect();
    sorted.sort_by_cached_key(|row| date_key(row));
    sorted
}

/// Parse a sheet date cell such as `2024-03-15`, `2024/3/15` or `2024. 3. 15.`
///
/// A bare year and month (`2024-03`, `2024. 3.`) yields the first of that month.
pub fn parse_sheet_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().trim_end_matches('.').trim_end();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    let first_of_month = format!("{}|1", text);
    MONTH_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(&first_of_month, &format!("{}|%d", fmt)).ok()
    })
}

/// Month key of a free-form date cell
pub fn month_key_for_date(text: &str) -> Option<String> {
    parse_sheet_date(text).map(|date| format!("{:04}-{:02}", date.year(), date.month()))
}
