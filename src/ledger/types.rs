//! Core data types for the sheetboard ledger
//!
//! This module defines the row shapes produced by the parser and the derived
//! series produced by the aggregator:
//! - `TransactionRow` / `RevenueRow`: raw sheet rows, text fields only
//! - `DailyBalancePoint` / `MonthlyBalancePoint`: running balance series
//! - `MonthlyAggregate`: per-month inflow/outflow/revenue bucket
//! - `PeriodFilterSummary` / `PeriodOptions`: period selection views
//! - `Granularity` and `DashboardFilter`: the explicit filter configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the transaction sheet (`거래내역`)
///
/// Every field arrives as text. Amount columns may carry thousands
/// separators or be empty; they are only converted by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransactionRow {
    /// Transaction date as written in the sheet
    #[serde(rename = "거래일")]
    pub date: String,
    /// Year, e.g. "2024"
    #[serde(rename = "년")]
    pub year: String,
    /// Month 1-12, usually unpadded
    #[serde(rename = "월")]
    pub month: String,
    /// Day of month, usually unpadded
    #[serde(rename = "일")]
    pub day: String,
    /// Bank account the transaction belongs to
    #[serde(rename = "통장구분", alias = "통장 구분")]
    pub account: String,
    /// Free-text description
    #[serde(rename = "적요")]
    pub summary: String,
    /// Counterparty
    #[serde(rename = "거래처")]
    pub vendor: String,
    /// Money in
    #[serde(rename = "입금")]
    pub inflow: String,
    /// Money out
    #[serde(rename = "출금")]
    pub outflow: String,
    /// Ledger account (계정과목)
    #[serde(rename = "계정과목")]
    pub ledger_account: String,
    /// Cost classification (비용성격)
    #[serde(rename = "비용성격", alias = "비용 성격")]
    pub cost_nature: String,
}

impl TransactionRow {
    /// Create a row for the given calendar date fields
    pub fn new(year: impl Into<String>, month: impl Into<String>, day: impl Into<String>) -> Self {
        let year = year.into();
        let month = month.into();
        let day = day.into();
        Self {
            date: format!("{}-{:0>2}-{:0>2}", year, month, day),
            year,
            month,
            day,
            ..Default::default()
        }
    }

    /// Build a row from positional cell values (columns A..K)
    ///
    /// Missing trailing cells become empty strings.
    pub fn from_values(values: &[String]) -> Self {
        let cell = |idx: usize| values.get(idx).cloned().unwrap_or_default();
        Self {
            date: cell(0),
            year: cell(1),
            month: cell(2),
            day: cell(3),
            account: cell(4),
            summary: cell(5),
            vendor: cell(6),
            inflow: cell(7),
            outflow: cell(8),
            ledger_account: cell(9),
            cost_nature: cell(10),
        }
    }

    /// Builder method: set the inflow amount text
    pub fn inflow(mut self, amount: impl Into<String>) -> Self {
        self.inflow = amount.into();
        self
    }

    /// Builder method: set the outflow amount text
    pub fn outflow(mut self, amount: impl Into<String>) -> Self {
        self.outflow = amount.into();
        self
    }

    /// Builder method: set the counterparty
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Whether year, month and day are all present
    pub fn has_full_date(&self) -> bool {
        !self.year.is_empty() && !self.month.is_empty() && !self.day.is_empty()
    }
}

/// One row of the revenue sheet (`매출`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RevenueRow {
    /// Date the revenue is booked on
    #[serde(rename = "날짜")]
    pub date: String,
    /// Revenue amount text
    #[serde(rename = "매출액")]
    pub amount: String,
    /// Note
    #[serde(rename = "비고")]
    pub note: String,
}

impl RevenueRow {
    /// Create a revenue row
    pub fn new(date: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount: amount.into(),
            note: String::new(),
        }
    }

    /// Build a row from positional cell values (columns A..C)
    ///
    /// A missing amount cell reads as "0".
    pub fn from_values(values: &[String]) -> Self {
        Self {
            date: values.first().cloned().unwrap_or_default(),
            amount: values.get(1).cloned().unwrap_or_else(|| "0".to_string()),
            note: values.get(2).cloned().unwrap_or_default(),
        }
    }
}

/// Running balance after one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBalancePoint {
    /// Date text of the transaction that produced this point
    pub date: String,
    /// Cumulative balance over every transaction up to and including this one
    pub balance: i64,
}

/// Last running balance observed within a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBalancePoint {
    /// Period key "YYYY-MM"
    pub month: String,
    pub balance: i64,
}

/// Inflow/outflow bucket for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAggregate {
    /// Period key "YYYY-MM"
    pub period_key: String,
    pub inflow: i64,
    pub outflow: i64,
    /// inflow - outflow for this month only
    pub net_balance: i64,
    /// Revenue booked for this month, when the revenue sheet has a row for it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,
}

impl MonthlyAggregate {
    /// Create an empty bucket
    pub fn new(period_key: impl Into<String>) -> Self {
        Self {
            period_key: period_key.into(),
            inflow: 0,
            outflow: 0,
            net_balance: 0,
            revenue: None,
        }
    }
}

/// Totals over the rows matching the selected period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodFilterSummary {
    pub total_inflow: i64,
    pub total_outflow: i64,
    pub net_balance: i64,
    pub transaction_count: usize,
}

/// Selectable period keys, one list per granularity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodOptions {
    /// "YYYY-MM" keys, ascending
    pub months: Vec<String>,
    /// "YYYY-Q#" keys, ascending
    pub quarters: Vec<String>,
}

impl PeriodOptions {
    /// Options for the given granularity
    pub fn for_granularity(&self, granularity: Granularity) -> &[String] {
        match granularity {
            Granularity::Month => &self.months,
            Granularity::Quarter => &self.quarters,
        }
    }
}

/// Spend for one calendar month, all years merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyExpense {
    /// Label "01월".."12월"
    pub month: String,
    pub expense: i64,
}

/// Period bucketing granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Calendar month, key "YYYY-MM"
    #[default]
    #[serde(alias = "monthly")]
    Month,
    /// Calendar quarter, key "YYYY-Q#"
    #[serde(alias = "quarterly")]
    Quarter,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Month => write!(f, "month"),
            Granularity::Quarter => write!(f, "quarter"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Granularity::Month),
            "quarter" | "quarterly" => Ok(Granularity::Quarter),
            other => Err(format!(
                "Invalid granularity: {}. Use month or quarter",
                other
            )),
        }
    }
}

/// Dashboard filter configuration, threaded explicitly through the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    #[serde(default)]
    pub granularity: Granularity,
    /// Selected period key; `None` means the whole dataset
    #[serde(default)]
    pub selected_period: Option<String>,
    #[serde(default = "default_scope")]
    pub department: String,
    #[serde(default = "default_scope")]
    pub project: String,
}

fn default_scope() -> String {
    "all".to_string()
}

impl Default for DashboardFilter {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            selected_period: None,
            department: default_scope(),
            project: default_scope(),
        }
    }
}

impl DashboardFilter {
    /// Filter for one period at the given granularity
    pub fn period(granularity: Granularity, key: impl Into<String>) -> Self {
        Self {
            granularity,
            selected_period: Some(key.into()),
            ..Default::default()
        }
    }

    /// Builder method: switch granularity
    ///
    /// The selected period is cleared since keys differ between granularities.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        if self.granularity != granularity {
            self.selected_period = None;
        }
        self.granularity = granularity;
        self
    }

    /// Selected period, treating an empty key as no selection
    pub fn active_period(&self) -> Option<&str> {
        self.selected_period.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_row_from_values_pads_missing_cells() {
        let values: Vec<String> = ["2024-01-05", "2024", "1", "5", "주거래"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = TransactionRow::from_values(&values);

        assert_eq!(row.year, "2024");
        assert_eq!(row.account, "주거래");
        assert_eq!(row.inflow, "");
        assert_eq!(row.cost_nature, "");
    }

    #[test]
    fn test_revenue_row_from_values_defaults_amount() {
        let row = RevenueRow::from_values(&["2024-03-01".to_string()]);
        assert_eq!(row.amount, "0");
        assert_eq!(row.note, "");
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("month".parse::<Granularity>(), Ok(Granularity::Month));
        assert_eq!("Quarterly".parse::<Granularity>(), Ok(Granularity::Quarter));
        assert!("yearly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_filter_granularity_switch_clears_selection() {
        let filter = DashboardFilter::period(Granularity::Month, "2024-01")
            .with_granularity(Granularity::Quarter);
        assert_eq!(filter.granularity, Granularity::Quarter);
        assert_eq!(filter.active_period(), None);

        let same = DashboardFilter::period(Granularity::Month, "2024-01")
            .with_granularity(Granularity::Month);
        assert_eq!(same.active_period(), Some("2024-01"));
    }

    #[test]
    fn test_empty_selected_period_is_inactive() {
        let filter = DashboardFilter::period(Granularity::Month, "");
        assert_eq!(filter.active_period(), None);
    }
}
