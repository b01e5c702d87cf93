//! Payment methods API endpoints.

use api_types::payment_method::{
    PaymentMethodKind as ApiKind, PaymentMethodNew, PaymentMethodPatch, PaymentMethodView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{PaymentMethodCmd, PaymentMethodKind, PaymentMethodUpdate, users};

use crate::{ServerError, minor_units, money, optional_minor_units, server::ServerState};

fn map_kind(kind: PaymentMethodKind) -> ApiKind {
    match kind {
        PaymentMethodKind::Cash => ApiKind::Cash,
        PaymentMethodKind::Debit => ApiKind::Debit,
        PaymentMethodKind::Credit => ApiKind::Credit,
    }
}

fn engine_kind(kind: ApiKind) -> PaymentMethodKind {
    match kind {
        ApiKind::Cash => PaymentMethodKind::Cash,
        ApiKind::Debit => PaymentMethodKind::Debit,
        ApiKind::Credit => PaymentMethodKind::Credit,
    }
}

fn map_method(method: engine::PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: method.id,
        name: method.name,
        kind: map_kind(method.kind),
        bank: method.bank,
        credit_limit: money(method.credit_limit_minor),
        expires_on: method.expires_on,
        active: method.active,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PaymentMethodView>>, ServerError> {
    let methods = state
        .engine
        .list_payment_methods(&user.username)
        .await?
        .into_iter()
        .map(map_method)
        .collect();
    Ok(Json(methods))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodNew>,
) -> Result<(StatusCode, Json<PaymentMethodView>), ServerError> {
    let mut cmd = PaymentMethodCmd::new(payload.name, engine_kind(payload.kind));
    if let Some(bank) = payload.bank {
        cmd = cmd.bank(bank);
    }
    if let Some(limit) = payload.credit_limit {
        cmd = cmd.credit_limit(minor_units(limit, "credit_limit")?);
    }
    if let Some(expires_on) = payload.expires_on {
        cmd = cmd.expires_on(expires_on);
    }

    let method = state
        .engine
        .create_payment_method(&user.username, cmd)
        .await?;
    Ok((StatusCode::CREATED, Json(map_method(method))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentMethodView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let method = state.engine.payment_method(&user.username, id).await?;
    Ok(Json(map_method(method)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentMethodPatch>,
) -> Result<Json<PaymentMethodView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let update = PaymentMethodUpdate {
        name: payload.name,
        kind: payload.kind.map(engine_kind),
        bank: payload.bank,
        credit_limit_minor: optional_minor_units(payload.credit_limit, "credit_limit")?,
        expires_on: payload.expires_on,
        active: payload.active,
    };
    let method = state
        .engine
        .update_payment_method(&user.username, id, update)
        .await?;
    Ok(Json(map_method(method)))
}

/// Delete a payment method; transactions using it keep existing.
pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state
        .engine
        .delete_payment_method(&user.username, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
