//! Budgets API endpoints.

use api_types::budget::{BudgetNew, BudgetPatch, BudgetView, PeriodQuery};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{BudgetCmd, Period, PeriodParams, users};

use crate::{ServerError, minor_units, money, server::ServerState};

fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        year: budget.year,
        month: budget.month,
        category_id: budget.category_id,
        planned: money(budget.planned_minor),
    }
}

/// Without `month` and `year` every budget is listed.
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let params = PeriodParams {
        month: query.month,
        year: query.year,
    };
    let period = Period::resolve(&params, Utc::now().date_naive(), Period::AllTime)?;
    let budgets = state
        .engine
        .list_budgets(&user.username, period)
        .await?
        .into_iter()
        .map(map_budget)
        .collect();
    Ok(Json(budgets))
}

/// Create a budget. With `replace` an existing budget for the same month and
/// category gets the new planned amount instead of a conflict.
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let cmd = BudgetCmd::new(
        payload.year,
        payload.month,
        payload.category_id,
        minor_units(payload.planned, "planned")?,
    );
    let budget = if payload.replace {
        state.engine.set_budget(&user.username, cmd).await?
    } else {
        state.engine.create_budget(&user.username, cmd).await?
    };
    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<BudgetView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let budget = state.engine.budget(&user.username, id).await?;
    Ok(Json(map_budget(budget)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BudgetPatch>,
) -> Result<Json<BudgetView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let planned = minor_units(payload.planned, "planned")?;
    let budget = state
        .engine
        .update_budget(&user.username, id, planned)
        .await?;
    Ok(Json(map_budget(budget)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state.engine.delete_budget(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
