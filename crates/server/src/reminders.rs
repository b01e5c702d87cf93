//! Reminders API endpoints.

use api_types::reminder::{
    ReminderListQuery, ReminderNew, ReminderPatch, ReminderPriority as ApiPriority,
    ReminderStatus as ApiStatus, ReminderView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{ReminderCmd, ReminderPriority, ReminderStatus, ReminderUpdate, users};

use crate::{ServerError, minor_units, money, optional_minor_units, present, server::ServerState};

fn map_status(status: ReminderStatus) -> ApiStatus {
    match status {
        ReminderStatus::Pending => ApiStatus::Pending,
        ReminderStatus::Completed => ApiStatus::Completed,
    }
}

fn engine_status(status: ApiStatus) -> ReminderStatus {
    match status {
        ApiStatus::Pending => ReminderStatus::Pending,
        ApiStatus::Completed => ReminderStatus::Completed,
    }
}

fn map_priority(priority: ReminderPriority) -> ApiPriority {
    match priority {
        ReminderPriority::Low => ApiPriority::Low,
        ReminderPriority::Normal => ApiPriority::Normal,
        ReminderPriority::High => ApiPriority::High,
    }
}

fn engine_priority(priority: ApiPriority) -> ReminderPriority {
    match priority {
        ApiPriority::Low => ReminderPriority::Low,
        ApiPriority::Normal => ReminderPriority::Normal,
        ApiPriority::High => ReminderPriority::High,
    }
}

fn map_reminder(reminder: engine::Reminder) -> ReminderView {
    ReminderView {
        id: reminder.id,
        title: reminder.title,
        amount: reminder.amount_minor.map(money),
        due_on: reminder.due_on,
        payment_method_id: reminder.payment_method_id,
        category_id: reminder.category_id,
        status: map_status(reminder.status),
        priority: map_priority(reminder.priority),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReminderListQuery>,
) -> Result<Json<Vec<ReminderView>>, ServerError> {
    let status = present(&query.status)
        .map(|raw| ReminderStatus::try_from(raw.to_lowercase().as_str()))
        .transpose()?;
    let reminders = state
        .engine
        .list_reminders(&user.username, status)
        .await?
        .into_iter()
        .map(map_reminder)
        .collect();
    Ok(Json(reminders))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ReminderNew>,
) -> Result<(StatusCode, Json<ReminderView>), ServerError> {
    let mut cmd = ReminderCmd::new(payload.title, payload.due_on);
    if let Some(amount) = payload.amount {
        cmd = cmd.amount(minor_units(amount, "amount")?);
    }
    if let Some(method_id) = payload.payment_method_id {
        cmd = cmd.payment_method(method_id);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category(category_id);
    }
    if let Some(priority) = payload.priority {
        cmd = cmd.priority(engine_priority(priority));
    }

    let reminder = state.engine.create_reminder(&user.username, cmd).await?;
    Ok((StatusCode::CREATED, Json(map_reminder(reminder))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ReminderView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let reminder = state.engine.reminder(&user.username, id).await?;
    Ok(Json(map_reminder(reminder)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReminderPatch>,
) -> Result<Json<ReminderView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let amount_minor = payload
        .amount
        .map(|amount| optional_minor_units(amount, "amount"))
        .transpose()?;
    let update = ReminderUpdate {
        title: payload.title,
        amount_minor,
        due_on: payload.due_on,
        payment_method_id: payload.payment_method_id,
        category_id: payload.category_id,
        status: payload.status.map(engine_status),
        priority: payload.priority.map(engine_priority),
    };
    let reminder = state
        .engine
        .update_reminder(&user.username, id, update)
        .await?;
    Ok(Json(map_reminder(reminder)))
}

pub async fn complete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ReminderView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let reminder = state.engine.complete_reminder(&user.username, id).await?;
    Ok(Json(map_reminder(reminder)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state.engine.delete_reminder(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
