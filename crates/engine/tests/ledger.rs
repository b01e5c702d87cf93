use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    BudgetCmd, CategoryCmd, CategoryUpdate, Engine, EngineError, MoneyCents, PaymentMethodCmd,
    PaymentMethodKind, Period, RecurringPaymentCmd, RecurringStatus, ReminderCmd,
    ReminderPriority, ReminderStatus, TransactionCmd, TransactionFilter, TransactionKind,
    TransactionUpdate, reports,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "bob"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn category_defaults_and_unique_names() {
    let (engine, _db) = engine_with_db().await;

    let food = engine
        .create_category("alice", CategoryCmd::new("  Comida ", TransactionKind::Expense))
        .await
        .unwrap();
    assert_eq!(food.name, "Comida");
    assert_eq!(food.color, engine::DEFAULT_COLOR);
    assert_eq!(food.icon, engine::DEFAULT_ICON);
    assert!(food.active);

    let err = engine
        .create_category("alice", CategoryCmd::new("COMÍDA", TransactionKind::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // Another user may reuse the name.
    engine
        .create_category("bob", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();

    let err = engine
        .create_category(
            "alice",
            CategoryCmd::new("Ropa", TransactionKind::Expense).color("pink"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("color"));
}

#[tokio::test]
async fn inactive_categories_are_hidden_by_default() {
    let (engine, _db) = engine_with_db().await;
    let salary = engine
        .create_category("alice", CategoryCmd::new("Salario", TransactionKind::Income))
        .await
        .unwrap();
    engine
        .create_category("alice", CategoryCmd::new("Mascotas", TransactionKind::Expense))
        .await
        .unwrap();

    engine
        .update_category(
            "alice",
            salary.id,
            CategoryUpdate {
                active: Some(false),
                ..CategoryUpdate::default()
            },
        )
        .await
        .unwrap();

    let visible = engine.list_categories("alice", false).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Mascotas");
    let all = engine.list_categories("alice", true).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn lookups_do_not_cross_users() {
    let (engine, _db) = engine_with_db().await;
    let category = engine
        .create_category("alice", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();

    let err = engine.category("bob", category.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .create_transaction(
            "bob",
            TransactionCmd::expense(1_000, day(2024, 1, 1)).category(category.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let food = engine
        .create_category("alice", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();

    let older = engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(2_500, day(2024, 1, 10))
                .category(food.id)
                .note("Whiskas"),
        )
        .await
        .unwrap();
    let newer = engine
        .create_transaction("alice", TransactionCmd::income(300_000, day(2024, 1, 31)))
        .await
        .unwrap();
    let same_day = engine
        .create_transaction("alice", TransactionCmd::expense(100, day(2024, 1, 31)))
        .await
        .unwrap();

    let all = engine
        .list_transactions("alice", &TransactionFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![same_day.id, newer.id, older.id]);

    let by_note = TransactionFilter {
        description_contains: Some("whis".to_string()),
        ..TransactionFilter::default()
    };
    let found = engine.list_transactions("alice", &by_note).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, older.id);

    let nothing = engine
        .list_transactions("bob", &TransactionFilter::default())
        .await
        .unwrap();
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn transaction_validation_names_the_field() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_transaction("alice", TransactionCmd::expense(-1, day(2024, 1, 1)))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("amount"));

    let err = engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(1_000, day(2024, 1, 1)).installment(4, 3),
        )
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("installment_index"));
}

#[tokio::test]
async fn update_transaction_patches_and_clears() {
    let (engine, _db) = engine_with_db().await;
    let food = engine
        .create_category("alice", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(1_000, day(2024, 1, 1))
                .category(food.id)
                .note("arena"),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            "alice",
            tx.id,
            TransactionUpdate {
                amount_minor: Some(1_250),
                note: Some(None),
                ..TransactionUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount(), MoneyCents::new(1_250));
    assert_eq!(updated.note, None);
    assert_eq!(updated.category_id, Some(food.id));

    let unchanged = engine
        .update_transaction("alice", tx.id, TransactionUpdate::default())
        .await
        .unwrap();
    assert_eq!(unchanged, updated);

    engine.delete_transaction("alice", tx.id).await.unwrap();
    let err = engine.transaction("alice", tx.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn deleting_a_category_cascades() {
    let (engine, _db) = engine_with_db().await;
    let food = engine
        .create_category("alice", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();
    let vet = engine
        .create_category("alice", CategoryCmd::new("Veterinario", TransactionKind::Expense))
        .await
        .unwrap();
    engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(4_500, day(2024, 1, 10)).category(food.id),
        )
        .await
        .unwrap();
    engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(12_000, day(2024, 1, 12)).category(vet.id),
        )
        .await
        .unwrap();
    engine
        .create_budget("alice", BudgetCmd::new(2024, 1, food.id, 20_000))
        .await
        .unwrap();
    let reminder = engine
        .create_reminder(
            "alice",
            ReminderCmd::new("Comprar pienso", day(2024, 2, 1)).category(food.id),
        )
        .await
        .unwrap();

    engine.delete_category("alice", food.id).await.unwrap();

    let remaining = engine
        .list_transactions("alice", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].category_id, Some(vet.id));

    let breakdown = reports::category_breakdown(
        &engine,
        "alice",
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category_id, vet.id);

    let usage = reports::budget_utilization(&engine, "alice", Period::AllTime)
        .await
        .unwrap();
    assert!(usage.is_empty());

    let reminder = engine.reminder("alice", reminder.id).await.unwrap();
    assert_eq!(reminder.category_id, None);
}

#[tokio::test]
async fn payment_methods_enforce_credit_limits() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_payment_method(
            "alice",
            PaymentMethodCmd::new("Efectivo", PaymentMethodKind::Cash).credit_limit(1_000),
        )
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("credit_limit"));

    let card = engine
        .create_payment_method(
            "alice",
            PaymentMethodCmd::new("Visa Gatuna", PaymentMethodKind::Credit)
                .bank("Banco Michi")
                .credit_limit(500_000),
        )
        .await
        .unwrap();
    assert!(card.is_active_credit());

    let err = engine
        .create_payment_method(
            "alice",
            PaymentMethodCmd::new("visa gatuna", PaymentMethodKind::Debit),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn deleting_a_payment_method_keeps_its_transactions() {
    let (engine, _db) = engine_with_db().await;
    let card = engine
        .create_payment_method(
            "alice",
            PaymentMethodCmd::new("Visa", PaymentMethodKind::Credit).credit_limit(100_000),
        )
        .await
        .unwrap();
    let tx = engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(30_000, day(2024, 3, 1)).payment_method(card.id),
        )
        .await
        .unwrap();
    let netflix = engine
        .create_recurring_payment(
            "alice",
            RecurringPaymentCmd::new("Netflix", 1_599, day(2024, 1, 15)).payment_method(card.id),
        )
        .await
        .unwrap();

    let summary = reports::balance_summary(
        &engine,
        "alice",
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();
    assert_eq!(summary.available_credit, MoneyCents::new(70_000));
    assert_eq!(summary.recurring_monthly_total, MoneyCents::new(1_599));

    engine.delete_payment_method("alice", card.id).await.unwrap();

    let tx = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(tx.payment_method_id, None);
    let netflix = engine.recurring_payment("alice", netflix.id).await.unwrap();
    assert_eq!(netflix.payment_method_id, None);
}

#[tokio::test]
async fn renewing_moves_one_month_and_clamps() {
    let (engine, _db) = engine_with_db().await;
    let gym = engine
        .create_recurring_payment(
            "alice",
            RecurringPaymentCmd::new("Gimnasio", 3_500, day(2024, 1, 31)),
        )
        .await
        .unwrap();
    assert_eq!(gym.next_renewal_on, day(2024, 1, 31));

    let gym = engine.renew_recurring_payment("alice", gym.id).await.unwrap();
    assert_eq!(gym.next_renewal_on, day(2024, 2, 29));

    let paused = engine
        .create_recurring_payment(
            "alice",
            RecurringPaymentCmd::new("Spotify", 999, day(2024, 1, 1))
                .status(RecurringStatus::Paused),
        )
        .await
        .unwrap();
    let err = engine
        .renew_recurring_payment("alice", paused.id)
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("status"));

    let active = engine
        .list_recurring_payments("alice", Some(RecurringStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, gym.id);
}

#[tokio::test]
async fn budgets_are_unique_per_slot() {
    let (engine, _db) = engine_with_db().await;
    let food = engine
        .create_category("alice", CategoryCmd::new("Comida", TransactionKind::Expense))
        .await
        .unwrap();

    let budget = engine
        .create_budget("alice", BudgetCmd::new(2024, 1, food.id, 20_000))
        .await
        .unwrap();
    let err = engine
        .create_budget("alice", BudgetCmd::new(2024, 1, food.id, 30_000))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let replaced = engine
        .set_budget("alice", BudgetCmd::new(2024, 1, food.id, 30_000))
        .await
        .unwrap();
    assert_eq!(replaced.id, budget.id);
    assert_eq!(replaced.planned(), MoneyCents::new(30_000));

    let err = engine
        .create_budget("alice", BudgetCmd::new(2024, 13, food.id, 1))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("month"));

    engine
        .create_transaction(
            "alice",
            TransactionCmd::expense(27_000, day(2024, 1, 20)).category(food.id),
        )
        .await
        .unwrap();
    let usage = reports::budget_utilization(
        &engine,
        "alice",
        Period::Month {
            year: 2024,
            month: 1,
        },
    )
    .await
    .unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].spent, MoneyCents::new(27_000));
    assert_eq!(usage[0].category, "Comida");
    assert_eq!(usage[0].status, engine::BudgetStatus::Warning);

    let listed = engine
        .list_budgets("alice", Period::Year(2025))
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn reminders_complete_and_sort_by_due_date() {
    let (engine, _db) = engine_with_db().await;
    let later = engine
        .create_reminder(
            "alice",
            ReminderCmd::new("Pagar seguro", day(2024, 5, 1))
                .amount(45_000)
                .priority(ReminderPriority::High),
        )
        .await
        .unwrap();
    let sooner = engine
        .create_reminder("alice", ReminderCmd::new("Vacuna de Michi", day(2024, 4, 2)))
        .await
        .unwrap();
    assert_eq!(sooner.priority, ReminderPriority::Normal);
    assert_eq!(sooner.status, ReminderStatus::Pending);

    let all = engine.list_reminders("alice", None).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![sooner.id, later.id]);

    let done = engine.complete_reminder("alice", sooner.id).await.unwrap();
    assert_eq!(done.status, ReminderStatus::Completed);
    let again = engine.complete_reminder("alice", sooner.id).await.unwrap();
    assert_eq!(again, done);

    let pending = engine
        .list_reminders("alice", Some(ReminderStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, later.id);

    engine.delete_reminder("alice", later.id).await.unwrap();
    let err = engine.delete_reminder("alice", later.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
