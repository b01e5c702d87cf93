use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, MoneyCents};
use rust_decimal::Decimal;
use serde::Serialize;

pub use server::{router, run_with_listener};

mod budgets;
mod categories;
mod payment_methods;
mod recurring_payments;
mod reminders;
mod reports;
mod server;
mod transactions;
pub mod views;

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation { .. } | EngineError::InvalidAmount(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let status = status_for_engine_error(&err);
        let field = err.field();
        let error = message_for_engine_error(err);

        (status, Json(Error { error, field })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Convert a request amount to minor units, naming `field` on failure.
pub(crate) fn minor_units(amount: Decimal, field: &'static str) -> Result<i64, ServerError> {
    MoneyCents::try_from(amount)
        .map(i64::from)
        .map_err(|err| EngineError::validation(field, err.to_string()).into())
}

pub(crate) fn optional_minor_units(
    amount: Option<Decimal>,
    field: &'static str,
) -> Result<Option<i64>, ServerError> {
    amount.map(|value| minor_units(value, field)).transpose()
}

pub(crate) fn money(cents: i64) -> Decimal {
    MoneyCents::new(cents).to_decimal()
}

/// `None` for absent or blank query values.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
