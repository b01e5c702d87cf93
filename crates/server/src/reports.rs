//! Report API endpoints.
//!
//! Filter and period parameters arrive as raw strings; a malformed value is
//! rejected with the offending field instead of being silently defaulted.

use api_types::{
    budget::PeriodQuery,
    report::{
        BudgetUsageView, CategoryAmountView, DashboardView, MonthTotalsView, ReportQuery,
        SummaryView,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use engine::{FilterParams, Period, PeriodParams, TransactionFilter, reports, users};

use crate::{ServerError, server::ServerState, views};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn filter_of(query: &ReportQuery) -> Result<TransactionFilter, ServerError> {
    let filter = TransactionFilter::compose(&FilterParams {
        kind: query.kind.clone(),
        category_id: query.category_id.clone(),
        payment_method_id: query.payment_method_id.clone(),
        date_from: query.date_from.clone(),
        date_to: query.date_to.clone(),
        description_contains: query.description_contains.clone(),
    })?;
    Ok(filter)
}

fn period_params(query: &ReportQuery) -> PeriodParams {
    PeriodParams {
        month: query.month.clone(),
        year: query.year.clone(),
    }
}

/// Explicit date bounds widen the default period to all time; otherwise
/// reports cover the current month.
fn period_of(query: &ReportQuery, filter: &TransactionFilter) -> Result<Period, ServerError> {
    let today = today();
    let default = if filter.has_date_bounds() {
        Period::AllTime
    } else {
        Period::month_of(today)
    };
    Ok(Period::resolve(&period_params(query), today, default)?)
}

pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SummaryView>, ServerError> {
    let filter = filter_of(&query)?;
    let period = period_of(&query, &filter)?;
    tracing::debug!(user = %user.username, ?period, "balance summary");

    let summary = reports::balance_summary(&*state.engine, &user.username, &filter, period).await?;
    Ok(Json(views::summary(summary)))
}

pub async fn categories(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<CategoryAmountView>>, ServerError> {
    let filter = filter_of(&query)?;
    let period = period_of(&query, &filter)?;
    tracing::debug!(user = %user.username, ?period, "category breakdown");

    let breakdown =
        reports::category_breakdown(&*state.engine, &user.username, &filter, period).await?;
    Ok(Json(breakdown.into_iter().map(views::category).collect()))
}

/// Twelve months of the requested year, the current one by default. A
/// `month` does not narrow the trend but is still validated.
pub async fn trend(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<MonthTotalsView>>, ServerError> {
    let filter = filter_of(&query)?;
    let year = Period::trend_year(&period_params(&query), today())?;
    tracing::debug!(user = %user.username, year, "monthly trend");

    let months = reports::monthly_trend(&*state.engine, &user.username, year, &filter).await?;
    Ok(Json(months.into_iter().map(views::month).collect()))
}

/// Budget usage only takes a period; transaction filters do not apply.
pub async fn budgets(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<BudgetUsageView>>, ServerError> {
    let params = PeriodParams {
        month: query.month,
        year: query.year,
    };
    let period = Period::resolve(&params, today(), Period::AllTime)?;
    tracing::debug!(user = %user.username, ?period, "budget utilization");

    let usage = reports::budget_utilization(&*state.engine, &user.username, period).await?;
    Ok(Json(usage.into_iter().map(views::budget_usage).collect()))
}

pub async fn dashboard(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<DashboardView>, ServerError> {
    let filter = filter_of(&query)?;
    let period = period_of(&query, &filter)?;
    tracing::debug!(user = %user.username, ?period, "dashboard");

    let dashboard = reports::dashboard(&*state.engine, &user.username, &filter, period).await?;
    Ok(Json(views::dashboard(dashboard)))
}
