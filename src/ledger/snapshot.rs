//! Dashboard snapshot
//!
//! Runs the full aggregation pipeline for one filter in a single call.

use super::aggregate::{
    daily_balances, monthly_aggregates, monthly_balances, monthly_expenses, period_options,
    period_summary,
};
use super::types::{
    DailyBalancePoint, DashboardFilter, MonthlyAggregate, MonthlyBalancePoint, MonthlyExpense,
    PeriodFilterSummary, PeriodOptions, RevenueRow, TransactionRow,
};
use serde::Serialize;

/// Every derived view the presentation layer may depend on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    /// Filter the snapshot was built for
    pub filter: DashboardFilter,
    pub daily_balances: Vec<DailyBalancePoint>,
    pub monthly_balances: Vec<MonthlyBalancePoint>,
    pub monthly_aggregates: Vec<MonthlyAggregate>,
    pub period_options: PeriodOptions,
    pub monthly_expenses: Vec<MonthlyExpense>,
    /// Totals for the selected period, or the whole dataset without one
    pub summary: PeriodFilterSummary,
}

impl DashboardSnapshot {
    /// Build every view from fully loaded row sets
    pub fn build(
        transactions: &[TransactionRow],
        revenue: &[RevenueRow],
        filter: &DashboardFilter,
    ) -> Self {
        let snapshot = Self {
            filter: filter.clone(),
            daily_balances: daily_balances(transactions),
            monthly_balances: monthly_balances(transactions),
            monthly_aggregates: monthly_aggregates(transactions, Some(revenue)),
            period_options: period_options(transactions),
            monthly_expenses: monthly_expenses(transactions),
            summary: period_summary(transactions, filter),
        };

        tracing::debug!(
            transactions = transactions.len(),
            revenue_rows = revenue.len(),
            months = snapshot.monthly_aggregates.len(),
            granularity = %filter.granularity,
            period = ?filter.active_period(),
            "Built dashboard snapshot"
        );

        snapshot
    }

    /// Closing balance of the whole dataset
    pub fn closing_balance(&self) -> i64 {
        self.daily_balances.last().map(|p| p.balance).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Granularity;

    fn rows() -> Vec<TransactionRow> {
        vec![
            TransactionRow::new("2024", "1", "3").inflow("1,000"),
            TransactionRow::new("2024", "1", "9").outflow("500"),
            TransactionRow::new("2024", "2", "1").inflow("2,000"),
        ]
    }

    #[test]
    fn test_snapshot_builds_all_views() {
        let revenue = vec![RevenueRow::new("2024-02-10", "3,000")];
        let snapshot = DashboardSnapshot::build(&rows(), &revenue, &DashboardFilter::default());

        assert_eq!(snapshot.daily_balances.len(), 3);
        assert_eq!(snapshot.closing_balance(), 2500);
        assert_eq!(snapshot.monthly_balances.len(), 2);
        assert_eq!(snapshot.monthly_aggregates[1].revenue, Some(3000));
        assert_eq!(snapshot.period_options.quarters, vec!["2024-Q1"]);
        assert_eq!(snapshot.monthly_expenses[0].expense, 500);
        assert_eq!(snapshot.summary.transaction_count, 3);
    }

    #[test]
    fn test_snapshot_summary_follows_filter() {
        let filter = DashboardFilter::period(Granularity::Month, "2024-02");
        let snapshot = DashboardSnapshot::build(&rows(), &[], &filter);

        assert_eq!(snapshot.summary.transaction_count, 1);
        assert_eq!(snapshot.summary.net_balance, 2000);
        // series views are never period-scoped
        assert_eq!(snapshot.daily_balances.len(), 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DashboardSnapshot::build(&[], &[], &DashboardFilter::default());

        assert!(snapshot.daily_balances.is_empty());
        assert_eq!(snapshot.closing_balance(), 0);
        assert_eq!(snapshot.monthly_expenses.len(), 12);
        assert_eq!(snapshot.summary, PeriodFilterSummary::default());
    }
}
