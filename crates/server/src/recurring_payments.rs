//! Recurring payments API endpoints.

use api_types::recurring::{
    RecurringListQuery, RecurringPaymentNew, RecurringPaymentPatch, RecurringPaymentView,
    RecurringStatus as ApiStatus,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{RecurringPaymentCmd, RecurringPaymentUpdate, RecurringStatus, users};

use crate::{ServerError, minor_units, money, optional_minor_units, present, server::ServerState};

fn map_status(status: RecurringStatus) -> ApiStatus {
    match status {
        RecurringStatus::Active => ApiStatus::Active,
        RecurringStatus::Paused => ApiStatus::Paused,
        RecurringStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn engine_status(status: ApiStatus) -> RecurringStatus {
    match status {
        ApiStatus::Active => RecurringStatus::Active,
        ApiStatus::Paused => RecurringStatus::Paused,
        ApiStatus::Cancelled => RecurringStatus::Cancelled,
    }
}

fn map_payment(payment: engine::RecurringPayment) -> RecurringPaymentView {
    RecurringPaymentView {
        id: payment.id,
        name: payment.name,
        platform: payment.platform,
        monthly_amount: money(payment.monthly_amount_minor),
        annual_amount: payment.annual_amount_minor.map(money),
        payment_method_id: payment.payment_method_id,
        started_on: payment.started_on,
        next_renewal_on: payment.next_renewal_on,
        status: map_status(payment.status),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RecurringListQuery>,
) -> Result<Json<Vec<RecurringPaymentView>>, ServerError> {
    let status = present(&query.status)
        .map(|raw| RecurringStatus::try_from(raw.to_lowercase().as_str()))
        .transpose()?;
    let payments = state
        .engine
        .list_recurring_payments(&user.username, status)
        .await?
        .into_iter()
        .map(map_payment)
        .collect();
    Ok(Json(payments))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecurringPaymentNew>,
) -> Result<(StatusCode, Json<RecurringPaymentView>), ServerError> {
    let mut cmd = RecurringPaymentCmd::new(
        payload.name,
        minor_units(payload.monthly_amount, "monthly_amount")?,
        payload.started_on,
    );
    if let Some(platform) = payload.platform {
        cmd = cmd.platform(platform);
    }
    if let Some(annual) = payload.annual_amount {
        cmd = cmd.annual_amount(minor_units(annual, "annual_amount")?);
    }
    if let Some(method_id) = payload.payment_method_id {
        cmd = cmd.payment_method(method_id);
    }
    if let Some(next) = payload.next_renewal_on {
        cmd = cmd.next_renewal_on(next);
    }
    if let Some(status) = payload.status {
        cmd = cmd.status(engine_status(status));
    }

    let payment = state
        .engine
        .create_recurring_payment(&user.username, cmd)
        .await?;
    Ok((StatusCode::CREATED, Json(map_payment(payment))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RecurringPaymentView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let payment = state.engine.recurring_payment(&user.username, id).await?;
    Ok(Json(map_payment(payment)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RecurringPaymentPatch>,
) -> Result<Json<RecurringPaymentView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let annual_amount_minor = payload
        .annual_amount
        .map(|annual| optional_minor_units(annual, "annual_amount"))
        .transpose()?;
    let update = RecurringPaymentUpdate {
        name: payload.name,
        platform: payload.platform,
        monthly_amount_minor: optional_minor_units(payload.monthly_amount, "monthly_amount")?,
        annual_amount_minor,
        payment_method_id: payload.payment_method_id,
        started_on: payload.started_on,
        next_renewal_on: payload.next_renewal_on,
        status: payload.status.map(engine_status),
    };
    let payment = state
        .engine
        .update_recurring_payment(&user.username, id, update)
        .await?;
    Ok(Json(map_payment(payment)))
}

/// Advance the next renewal date by one month.
pub async fn renew(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<RecurringPaymentView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let payment = state
        .engine
        .renew_recurring_payment(&user.username, id)
        .await?;
    tracing::debug!(user = %user.username, id, next = %payment.next_renewal_on, "renewed");
    Ok(Json(map_payment(payment)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state
        .engine
        .delete_recurring_payment(&user.username, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
