use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            db.get_database_backend(),
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    server::router(engine, db)
}

fn basic(user: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:password")))
}

async fn call(
    app: &Router,
    user: &str,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(user));
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_january(app: &Router) -> i64 {
    let (status, food) = call(
        app,
        "alice",
        Method::POST,
        "/categories",
        Some(json!({"name": "Comida", "kind": "expense", "icon": "🍕"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let food_id = food["id"].as_i64().unwrap();

    for body in [
        json!({"kind": "income", "amount": "2500.00", "occurred_on": "2024-01-05"}),
        json!({"kind": "expense", "amount": "120.50", "occurred_on": "2024-01-10", "category_id": food_id}),
        json!({"kind": "expense", "amount": 79.5, "occurred_on": "2024-01-20", "category_id": food_id}),
        json!({"kind": "expense", "amount": "40.00", "occurred_on": "2024-02-02", "category_id": food_id}),
    ] {
        let (status, _) = call(app, "alice", Method::POST, "/transactions", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    food_id
}

#[tokio::test]
async fn health_is_public_and_the_rest_needs_credentials() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/reports/summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/transactions")
                .header(
                    header::AUTHORIZATION,
                    format!("Basic {}", BASE64.encode("alice:wrong")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn monthly_summary_reports_exact_money_as_strings() {
    let app = app().await;
    seed_january(&app).await;

    let (status, summary) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/summary?month=1&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["income"], "2500.00");
    assert_eq!(summary["expenses"], "200.00");
    assert_eq!(summary["balance"], "2300.00");
    assert_eq!(summary["recurring_monthly_total"], "0.00");
    assert_eq!(summary["available_credit"], "0.00");

    let (_, all_time) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/summary?date_from=2024-01-01",
        None,
    )
    .await;
    assert_eq!(all_time["expenses"], "240.00");
}

#[tokio::test]
async fn breakdown_and_dashboard_share_the_period() {
    let app = app().await;
    let food_id = seed_january(&app).await;

    let (status, breakdown) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/categories?month=01&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(breakdown.as_array().unwrap().len(), 1);
    assert_eq!(breakdown[0]["category_id"], food_id);
    assert_eq!(breakdown[0]["category"], "Comida");
    assert_eq!(breakdown[0]["icon"], "🍕");
    assert_eq!(breakdown[0]["amount"], "200.00");

    let (_, income_only) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/categories?month=1&year=2024&kind=income",
        None,
    )
    .await;
    assert_eq!(income_only, json!([]));

    let (_, dashboard) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/dashboard?month=2&year=2024",
        None,
    )
    .await;
    assert_eq!(dashboard["period"], json!({"year": 2024, "month": 2}));
    assert_eq!(dashboard["summary"]["expenses"], "40.00");
    assert_eq!(dashboard["categories"][0]["amount"], "40.00");
}

#[tokio::test]
async fn trend_has_twelve_zero_filled_months() {
    let app = app().await;
    seed_january(&app).await;

    let (status, trend) = call(&app, "alice", Method::GET, "/reports/trend?year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    let months = trend.as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0]["month"], 1);
    assert_eq!(months[0]["balance"], "2300.00");
    assert_eq!(months[1]["expenses"], "40.00");
    assert_eq!(months[11]["income"], "0.00");
}

#[tokio::test]
async fn malformed_parameters_name_the_field() {
    let app = app().await;

    let (status, body) = call(&app, "alice", Method::GET, "/transactions/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "id");

    let (status, body) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/summary?month=13&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "month");

    let (status, body) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/trend?year=abcd",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "year");

    for uri in [
        "/reports/trend?year=2024&month=abc",
        "/reports/trend?year=2024&month=13",
    ] {
        let (status, body) = call(&app, "alice", Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "month");
    }

    let (status, body) = call(
        &app,
        "alice",
        Method::POST,
        "/transactions",
        Some(json!({"kind": "expense", "amount": "12.345", "occurred_on": "2024-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "amount");
}

#[tokio::test]
async fn missing_and_foreign_rows_are_not_found() {
    let app = app().await;
    let food_id = seed_january(&app).await;

    let (status, _) = call(&app, "alice", Method::GET, "/categories/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/categories/{food_id}");
    let (status, _) = call(&app, "bob", Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, summary) = call(
        &app,
        "bob",
        Method::GET,
        "/reports/summary?year=2024",
        None,
    )
    .await;
    assert_eq!(summary["expenses"], "0.00");
}

#[tokio::test]
async fn duplicates_conflict() {
    let app = app().await;
    let food_id = seed_january(&app).await;

    let (status, _) = call(
        &app,
        "alice",
        Method::POST,
        "/categories",
        Some(json!({"name": "comida", "kind": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let budget = json!({"year": 2024, "month": 1, "category_id": food_id, "planned": "250.00"});
    let (status, _) = call(&app, "alice", Method::POST, "/budgets", Some(budget.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call(&app, "alice", Method::POST, "/budgets", Some(budget)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let replace = json!({
        "year": 2024,
        "month": 1,
        "category_id": food_id,
        "planned": "200.00",
        "replace": true
    });
    let (status, replaced) = call(&app, "alice", Method::POST, "/budgets", Some(replace)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(replaced["planned"], "200.00");

    let (_, usage) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/budgets?month=1&year=2024",
        None,
    )
    .await;
    assert_eq!(usage[0]["spent"], "200.00");
    assert_eq!(usage[0]["remaining"], "0.00");
    assert_eq!(usage[0]["status"], "warning");
}

#[tokio::test]
async fn budget_report_ignores_transaction_filters() {
    let app = app().await;
    let food_id = seed_january(&app).await;

    let budget = json!({"year": 2024, "month": 1, "category_id": food_id, "planned": "250.00"});
    let (status, _) = call(&app, "alice", Method::POST, "/budgets", Some(budget)).await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in [
        "/reports/budgets?month=1&year=2024",
        "/reports/budgets?month=1&year=2024&kind=income&description_contains=zzz",
    ] {
        let (status, usage) = call(&app, "alice", Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usage[0]["spent"], "200.00");
        assert_eq!(usage[0]["remaining"], "50.00");
    }

    let (status, body) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/budgets?month=13&year=2024",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "month");
}

#[tokio::test]
async fn patch_clears_with_null_and_delete_returns_no_content() {
    let app = app().await;
    let food_id = seed_january(&app).await;

    let (_, created) = call(
        &app,
        "alice",
        Method::POST,
        "/transactions",
        Some(json!({
            "kind": "expense",
            "amount": "10",
            "occurred_on": "2024-03-01",
            "category_id": food_id,
            "note": "café"
        })),
    )
    .await;
    let uri = format!("/transactions/{}", created["id"]);

    let (status, patched) = call(
        &app,
        "alice",
        Method::PATCH,
        &uri,
        Some(json!({"note": null, "category_id": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["note"], Value::Null);
    assert_eq!(patched["category_id"], Value::Null);
    assert_eq!(patched["amount"], "10.00");

    let (status, _) = call(&app, "alice", Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "alice", Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recurring_payments_and_credit_feed_the_summary() {
    let app = app().await;

    let (status, card) = call(
        &app,
        "alice",
        Method::POST,
        "/payment-methods",
        Some(json!({"name": "Visa", "kind": "credit", "credit_limit": "1000.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let card_id = card["id"].as_i64().unwrap();

    call(
        &app,
        "alice",
        Method::POST,
        "/transactions",
        Some(json!({
            "kind": "expense",
            "amount": "300.00",
            "occurred_on": "2024-01-15",
            "payment_method_id": card_id
        })),
    )
    .await;

    let (status, netflix) = call(
        &app,
        "alice",
        Method::POST,
        "/recurring-payments",
        Some(json!({
            "name": "Netflix",
            "monthly_amount": "15.99",
            "started_on": "2024-01-31",
            "payment_method_id": card_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(netflix["status"], "active");
    assert_eq!(netflix["next_renewal_on"], "2024-01-31");

    let uri = format!("/recurring-payments/{}/renew", netflix["id"]);
    let (status, renewed) = call(&app, "alice", Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renewed["next_renewal_on"], "2024-02-29");

    let (_, summary) = call(
        &app,
        "alice",
        Method::GET,
        "/reports/summary?month=1&year=2024",
        None,
    )
    .await;
    assert_eq!(summary["recurring_monthly_total"], "15.99");
    assert_eq!(summary["available_credit"], "700.00");
}

#[tokio::test]
async fn reminders_complete_and_filter_by_status() {
    let app = app().await;

    let (status, reminder) = call(
        &app,
        "alice",
        Method::POST,
        "/reminders",
        Some(json!({"title": "Pagar luz", "due_on": "2024-02-10", "amount": "45.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reminder["status"], "pending");
    assert_eq!(reminder["priority"], "normal");

    let uri = format!("/reminders/{}/complete", reminder["id"]);
    let (status, done) = call(&app, "alice", Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");

    let (_, pending) = call(&app, "alice", Method::GET, "/reminders?status=pending", None).await;
    assert_eq!(pending, json!([]));
    let (_, completed) = call(&app, "alice", Method::GET, "/reminders?status=COMPLETED", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    let (status, body) = call(&app, "alice", Method::GET, "/reminders?status=later", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "status");
}
