//! Dashboard Routes
//!
//! Aggregated views over the latest sheet rows. Every endpoint answers
//! `503 SOURCE_LOADING` until both sheets have loaded and `502 SOURCE_FAILED`
//! while either sheet's last refresh failed.
//!
//! - GET /api/v1/dashboard - Every view at once
//! - GET /api/v1/balances/daily - Running balance per date
//! - GET /api/v1/balances/monthly - Last running balance per month
//! - GET /api/v1/monthly - Inflow, outflow and revenue per month
//! - GET /api/v1/periods - Selectable months and quarters
//! - GET /api/v1/expenses - Expense per calendar month
//! - GET /api/v1/summary - Totals for the selected period

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{
    DailyBalancesResponse, DashboardQuery, ExpensesResponse, MonthlyAggregatesResponse,
    MonthlyBalancesResponse, SummaryResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::ledger::{self, DashboardSnapshot, PeriodOptions};

/// GET /api/v1/dashboard
///
/// Query parameters: `granularity` (month or quarter), `period`,
/// `department`, `project`.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardSnapshot>> {
    let filter = query.to_filter().map_err(ApiError::Validation)?;
    let snapshot = state.store.snapshot(&filter).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/balances/daily
pub async fn get_daily_balances(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DailyBalancesResponse>> {
    let (transactions, _) = state.store.rows().await?;
    let points = ledger::daily_balances(&transactions);
    let closing_balance = points.last().map(|p| p.balance).unwrap_or(0);

    Ok(Json(DailyBalancesResponse {
        points,
        closing_balance,
    }))
}

/// GET /api/v1/balances/monthly
pub async fn get_monthly_balances(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MonthlyBalancesResponse>> {
    let (transactions, _) = state.store.rows().await?;

    Ok(Json(MonthlyBalancesResponse {
        points: ledger::monthly_balances(&transactions),
    }))
}

/// GET /api/v1/monthly
///
/// Revenue is joined onto months that have transactions.
pub async fn get_monthly_aggregates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<MonthlyAggregatesResponse>> {
    let (transactions, revenue) = state.store.rows().await?;

    Ok(Json(MonthlyAggregatesResponse {
        months: ledger::monthly_aggregates(&transactions, Some(revenue.as_slice())),
    }))
}

/// GET /api/v1/periods
pub async fn get_period_options(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PeriodOptions>> {
    let (transactions, _) = state.store.rows().await?;
    Ok(Json(ledger::period_options(&transactions)))
}

/// GET /api/v1/expenses
pub async fn get_expenses(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ExpensesResponse>> {
    let (transactions, _) = state.store.rows().await?;
    let months = ledger::monthly_expenses(&transactions);
    let total = ledger::total_expense(&months);

    Ok(Json(ExpensesResponse { months, total }))
}

/// GET /api/v1/summary
///
/// Without a `period` the whole dataset is summarized.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let filter = query.to_filter().map_err(ApiError::Validation)?;
    let (transactions, _) = state.store.rows().await?;
    let summary = ledger::period_summary(&transactions, &filter);

    Ok(Json(SummaryResponse { filter, summary }))
}
