//! Transactions API endpoints.

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionNew, TransactionPatch, TransactionQuery,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{FilterParams, TransactionCmd, TransactionFilter, TransactionUpdate, users};

use crate::{ServerError, minor_units, money, optional_minor_units, server::ServerState};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount: money(tx.amount_minor),
        occurred_on: tx.occurred_on,
        category_id: tx.category_id,
        payment_method_id: tx.payment_method_id,
        note: tx.note,
        installments: tx.installments,
        installment_index: tx.installment_index,
        created_at: tx.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionFilter::compose(&FilterParams {
        kind: query.kind,
        category_id: query.category_id,
        payment_method_id: query.payment_method_id,
        date_from: query.date_from,
        date_to: query.date_to,
        description_contains: query.description_contains,
    })?;
    let transactions = state
        .engine
        .list_transactions(&user.username, &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();
    Ok(Json(transactions))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = TransactionCmd::new(
        engine_kind(payload.kind),
        minor_units(payload.amount, "amount")?,
        payload.occurred_on,
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category(category_id);
    }
    if let Some(method_id) = payload.payment_method_id {
        cmd = cmd.payment_method(method_id);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    cmd = cmd.installment(
        payload.installment_index.unwrap_or(1),
        payload.installments.unwrap_or(1),
    );

    let tx = state.engine.create_transaction(&user.username, cmd).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let tx = state.engine.transaction(&user.username, id).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionPatch>,
) -> Result<Json<TransactionView>, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    let update = TransactionUpdate {
        kind: payload.kind.map(engine_kind),
        amount_minor: optional_minor_units(payload.amount, "amount")?,
        occurred_on: payload.occurred_on,
        category_id: payload.category_id,
        payment_method_id: payload.payment_method_id,
        note: payload.note,
        installments: payload.installments,
        installment_index: payload.installment_index,
    };
    let tx = state
        .engine
        .update_transaction(&user.username, id, update)
        .await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = engine::parse_id(&id, "id")?;
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
