//! Categories API endpoints.

use api_types::category::{CategoryListQuery, CategoryNew, CategoryPatch, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{CategoryCmd, CategoryUpdate, users};

use crate::{
    ServerError, minor_units, money, optional_minor_units,
    server::ServerState,
    transactions::{engine_kind, map_kind},
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        color: category.color,
        icon: category.icon,
        description: category.description,
        monthly_budget: category.monthly_budget_minor.map(money),
        active: category.active,
        created_at: category.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let include_inactive = query.include_inactive.unwrap_or(false);
    let categories = state
        .engine
        .list_categories(&user.username, include_inactive)
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let mut cmd = CategoryCmd::new(payload.name, engine_kind(payload.kind));
    if let Some(color) = payload.color {
        cmd = cmd.color(color);
    }
    if let Some(icon) = payload.icon {
        cmd = cmd.icon(icon);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(amount) = payload.monthly_budget {
        cmd = cmd.monthly_budget(minor_units(amount, "monthly_budget")?);
    }

    let category = state.engine.create_category(&user.username, cmd).await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let category = state.engine.category(&user.username, id).await?;
    Ok(Json(map_category(category)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryPatch>,
) -> Result<Json<CategoryView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let monthly_budget_minor = payload
        .monthly_budget
        .map(|budget| optional_minor_units(budget, "monthly_budget"))
        .transpose()?;
    let update = CategoryUpdate {
        name: payload.name,
        kind: payload.kind.map(engine_kind),
        color: payload.color,
        icon: payload.icon,
        description: payload.description,
        monthly_budget_minor,
        active: payload.active,
    };
    let category = state
        .engine
        .update_category(&user.username, id, update)
        .await?;
    Ok(Json(map_category(category)))
}

/// Delete a category with its transactions and budgets.
pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state.engine.delete_category(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
