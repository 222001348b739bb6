//! Aggregation over parsed sheet rows
//!
//! Pure functions from immutable row slices to derived series. Nothing here
//! allocates shared state or mutates its input; callers rebuild every view
//! whenever rows or the filter change.

use super::amount::parse_amount;
use super::period::{month_key, month_key_for_date, period_key, sort_chronologically};
use super::types::{
    DailyBalancePoint, DashboardFilter, Granularity, MonthlyAggregate, MonthlyBalancePoint,
    MonthlyExpense, PeriodFilterSummary, PeriodOptions, RevenueRow, TransactionRow,
};
use std::collections::{HashMap, HashSet};

/// Net effect of one transaction row
///
/// All totals saturate at the `i64` bounds instead of overflowing.
fn net_amount(row: &TransactionRow) -> i64 {
    parse_amount(&row.inflow).saturating_sub(parse_amount(&row.outflow))
}

/// Running balance after every transaction, in date order
///
/// Produces one point per row; rows sharing a date each get their own point.
pub fn daily_balances(rows: &[TransactionRow]) -> Vec<DailyBalancePoint> {
    let mut running = 0i64;

    sort_chronologically(rows)
        .into_iter()
        .map(|row| {
            running = running.saturating_add(net_amount(row));
            DailyBalancePoint {
                date: row.date.clone(),
                balance: running,
            }
        })
        .collect()
}

/// Running balance as of the last transaction seen in each month
///
/// Rows without a full year/month/day are skipped. Each month keeps the
/// running value of whichever of its rows was processed last, which is the
/// closing balance because rows are sorted by full date first.
pub fn monthly_balances(rows: &[TransactionRow]) -> Vec<MonthlyBalancePoint> {
    let dated: Vec<TransactionRow> = rows.iter().filter(|r| r.has_full_date()).cloned().collect();

    let mut running = 0i64;
    let mut by_month: HashMap<String, i64> = HashMap::new();

    for row in sort_chronologically(&dated) {
        running = running.saturating_add(net_amount(row));
        by_month.insert(month_key(&row.year, &row.month), running);
    }

    let mut points: Vec<MonthlyBalancePoint> = by_month
        .into_iter()
        .map(|(month, balance)| MonthlyBalancePoint { month, balance })
        .collect();
    points.sort_by(|a, b| a.month.cmp(&b.month));
    points
}

/// Monthly inflow/outflow buckets, optionally joined with revenue
///
/// Revenue rows are keyed by their own date and only attach to months that
/// already have transactions; a later revenue row for the same month
/// replaces an earlier one.
pub fn monthly_aggregates(
    transactions: &[TransactionRow],
    revenue: Option<&[RevenueRow]>,
) -> Vec<MonthlyAggregate> {
    let mut buckets: HashMap<String, MonthlyAggregate> = HashMap::new();

    for row in transactions {
        let key = month_key(&row.year, &row.month);
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| MonthlyAggregate::new(key));
        bucket.inflow = bucket.inflow.saturating_add(parse_amount(&row.inflow));
        bucket.outflow = bucket.outflow.saturating_add(parse_amount(&row.outflow));
        bucket.net_balance = bucket.inflow.saturating_sub(bucket.outflow);
    }

    if let Some(revenue) = revenue {
        for row in revenue {
            let Some(key) = month_key_for_date(&row.date) else {
                tracing::debug!(date = %row.date, "Skipping revenue row with unparseable date");
                continue;
            };
            match buckets.get_mut(&key) {
                Some(bucket) => bucket.revenue = Some(parse_amount(&row.amount)),
                None => {
                    tracing::debug!(month = %key, "Dropping revenue for month without transactions")
                }
            }
        }
    }

    let mut aggregates: Vec<MonthlyAggregate> = buckets.into_values().collect();
    aggregates.sort_by(|a, b| a.period_key.cmp(&b.period_key));
    aggregates
}

/// Distinct month and quarter keys present in the rows, each ascending
pub fn period_options(rows: &[TransactionRow]) -> PeriodOptions {
    let months: HashSet<String> = rows
        .iter()
        .filter_map(|row| period_key(row, Granularity::Month))
        .collect();
    let quarters: HashSet<String> = rows
        .iter()
        .filter_map(|row| period_key(row, Granularity::Quarter))
        .collect();

    let mut months: Vec<String> = months.into_iter().collect();
    months.sort();
    let mut quarters: Vec<String> = quarters.into_iter().collect();
    quarters.sort();

    PeriodOptions { months, quarters }
}

/// Rows belonging to the filter's selected period
///
/// With no period selected every row passes through.
pub fn filter_rows<'a>(
    rows: &'a [TransactionRow],
    filter: &DashboardFilter,
) -> Vec<&'a TransactionRow> {
    match filter.active_period() {
        None => rows.iter().collect(),
        Some(selected) => rows
            .iter()
            .filter(|row| period_key(row, filter.granularity).as_deref() == Some(selected))
            .collect(),
    }
}

/// Totals over a set of rows
pub fn summarize<'a, I>(rows: I) -> PeriodFilterSummary
where
    I: IntoIterator<Item = &'a TransactionRow>,
{
    let mut summary = PeriodFilterSummary::default();

    for row in rows {
        summary.total_inflow = summary.total_inflow.saturating_add(parse_amount(&row.inflow));
        summary.total_outflow = summary.total_outflow.saturating_add(parse_amount(&row.outflow));
        summary.transaction_count += 1;
    }

    summary.net_balance = summary.total_inflow.saturating_sub(summary.total_outflow);
    summary
}

/// Summary for the filter's selected period, or the whole dataset
pub fn period_summary(rows: &[TransactionRow], filter: &DashboardFilter) -> PeriodFilterSummary {
    summarize(filter_rows(rows, filter))
}

/// Spend per calendar month, all years merged, January through December
///
/// Only dated rows with a positive outflow contribute.
pub fn monthly_expenses(rows: &[TransactionRow]) -> Vec<MonthlyExpense> {
    let mut totals = [0i64; 12];

    for row in rows {
        if !row.has_full_date() || row.outflow.is_empty() {
            continue;
        }
        let expense = parse_amount(&row.outflow);
        if expense <= 0 {
            continue;
        }
        if let Ok(month @ 1..=12) = row.month.trim().parse::<usize>() {
            totals[month - 1] = totals[month - 1].saturating_add(expense);
        }
    }

    totals
        .iter()
        .enumerate()
        .map(|(idx, expense)| MonthlyExpense {
            month: format!("{:02}월", idx + 1),
            expense: *expense,
        })
        .collect()
}

/// Sum of the monthly expense buckets
pub fn total_expense(months: &[MonthlyExpense]) -> i64 {
    months
        .iter()
        .fold(0i64, |total, m| total.saturating_add(m.expense))
}
