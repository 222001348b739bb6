//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::ledger::{
    DailyBalancePoint, DashboardFilter, Granularity, MonthlyAggregate, MonthlyBalancePoint,
    MonthlyExpense, PeriodFilterSummary,
};
use crate::sheets::SourceStatus;
use serde::{Deserialize, Serialize};

// ============================================
// DASHBOARD DTOs
// ============================================

/// Query string shared by the dashboard endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// "month" or "quarter", defaults to month
    #[serde(default)]
    pub granularity: Option<String>,
    /// Period key ("2024-03" or "2024-Q1"); absent or empty selects everything
    #[serde(default)]
    pub period: Option<String>,
    /// Echoed back, rows carry no department
    #[serde(default)]
    pub department: Option<String>,
    /// Echoed back, rows carry no project
    #[serde(default)]
    pub project: Option<String>,
}

impl DashboardQuery {
    /// Convert to a dashboard filter
    pub fn to_filter(&self) -> Result<DashboardFilter, String> {
        let granularity = match self.granularity.as_deref() {
            Some(g) if !g.trim().is_empty() => g.parse::<Granularity>()?,
            _ => Granularity::default(),
        };

        let mut filter = DashboardFilter {
            granularity,
            selected_period: self.period.clone().filter(|p| !p.is_empty()),
            ..Default::default()
        };
        if let Some(department) = &self.department {
            filter.department = department.clone();
        }
        if let Some(project) = &self.project {
            filter.project = project.clone();
        }

        Ok(filter)
    }
}

/// Running balance per date
#[derive(Debug, Serialize)]
pub struct DailyBalancesResponse {
    pub points: Vec<DailyBalancePoint>,
    /// Balance after the last row, 0 when there are no rows
    pub closing_balance: i64,
}

/// Last running balance per month
#[derive(Debug, Serialize)]
pub struct MonthlyBalancesResponse {
    pub points: Vec<MonthlyBalancePoint>,
}

/// Per-month inflow, outflow and revenue
#[derive(Debug, Serialize)]
pub struct MonthlyAggregatesResponse {
    pub months: Vec<MonthlyAggregate>,
}

/// Expense per calendar month
#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    pub months: Vec<MonthlyExpense>,
    pub total: i64,
}

/// Totals for the selected period
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub filter: DashboardFilter,
    pub summary: PeriodFilterSummary,
}

// ============================================
// SOURCE DTOs
// ============================================

/// Status of every sheet
#[derive(Debug, Serialize)]
pub struct SourceListResponse {
    /// Row source name, absent when rows are pushed in directly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub sheets: Vec<SourceStatus>,
}

/// Result of a manual refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// "success" when every sheet is ready, otherwise "failed"
    pub status: String,
    pub duration_ms: u64,
    pub sheets: Vec<SourceStatus>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded" or "unhealthy"
    pub status: String,
    /// State of the transaction sheet
    pub transactions: String,
    /// State of the revenue sheet
    pub revenue: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_is_unfiltered() {
        let filter = DashboardQuery::default().to_filter().unwrap();
        assert_eq!(filter, DashboardFilter::default());
    }

    #[test]
    fn test_query_to_filter() {
        let query = DashboardQuery {
            granularity: Some("quarterly".to_string()),
            period: Some("2024-Q2".to_string()),
            department: Some("영업".to_string()),
            project: None,
        };
        let filter = query.to_filter().unwrap();

        assert_eq!(filter.granularity, Granularity::Quarter);
        assert_eq!(filter.active_period(), Some("2024-Q2"));
        assert_eq!(filter.department, "영업");
        assert_eq!(filter.project, "all");
    }

    #[test]
    fn test_empty_period_selects_everything() {
        let query = DashboardQuery {
            period: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.to_filter().unwrap().selected_period, None);
    }

    #[test]
    fn test_invalid_granularity() {
        let query = DashboardQuery {
            granularity: Some("weekly".to_string()),
            ..Default::default()
        };
        assert!(query.to_filter().is_err());
    }
}
