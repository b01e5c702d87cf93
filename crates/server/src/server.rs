use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{
    budgets, categories, payment_methods, recurring_payments, reminders, reports, transactions,
};
use engine::{Engine, users};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// HTTP basic authentication against the users table.
///
/// The matching user is stored in the request extensions for the handlers.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<users::Model> = users::Entity::find()
        .filter(users::Column::Username.eq(auth_header.username()))
        .filter(users::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("failed to load user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn health() -> &'static str {
    "ok"
}

/// Build the application router. `/health` is the only public route.
pub fn router(engine: Engine, db: DatabaseConnection) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/payment-methods",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/payment-methods/{id}",
            get(payment_methods::get)
                .patch(payment_methods::update)
                .delete(payment_methods::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/recurring-payments",
            get(recurring_payments::list).post(recurring_payments::create),
        )
        .route(
            "/recurring-payments/{id}",
            get(recurring_payments::get)
                .patch(recurring_payments::update)
                .delete(recurring_payments::delete),
        )
        .route(
            "/recurring-payments/{id}/renew",
            post(recurring_payments::renew),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .patch(budgets::update)
                .delete(budgets::delete),
        )
        .route("/reminders", get(reminders::list).post(reminders::create))
        .route(
            "/reminders/{id}",
            get(reminders::get)
                .patch(reminders::update)
                .delete(reminders::delete),
        )
        .route("/reminders/{id}/complete", post(reminders::complete))
        .route("/reports/summary", get(reports::summary))
        .route("/reports/categories", get(reports::categories))
        .route("/reports/trend", get(reports::trend))
        .route("/reports/budgets", get(reports::budgets))
        .route("/reports/dashboard", get(reports::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, db)).await
}
