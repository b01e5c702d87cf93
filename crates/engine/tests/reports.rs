use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal_macros::dec;

use engine::{
    Budget, BudgetStatus, Category, FilterParams, MemoryStore, MoneyCents, PaymentMethod,
    PaymentMethodKind, Period, RecurringPayment, RecurringStatus, Transaction, TransactionFilter,
    TransactionKind, reports,
};

const USER: &str = "alice";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn created(id: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + id, 0).unwrap()
}

fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        user_id: USER.to_string(),
        name: name.to_string(),
        kind: TransactionKind::Expense,
        color: "#FF69B4".to_string(),
        icon: "🐱".to_string(),
        description: None,
        monthly_budget_minor: None,
        active: true,
        created_at: created(0),
    }
}

fn tx(id: i64, kind: TransactionKind, cents: i64, on: NaiveDate) -> Transaction {
    Transaction {
        id,
        user_id: USER.to_string(),
        kind,
        amount_minor: cents,
        occurred_on: on,
        category_id: None,
        payment_method_id: None,
        note: None,
        installments: 1,
        installment_index: 1,
        created_at: created(id),
    }
}

fn expense(id: i64, cents: i64, on: NaiveDate, category_id: i64) -> Transaction {
    Transaction {
        category_id: Some(category_id),
        ..tx(id, TransactionKind::Expense, cents, on)
    }
}

/// Income 3000 on Jan 5, Food 450 on Jan 10, Transport 120 on Feb 1.
fn three_transactions() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert_category(category(1, "Food"));
    store.insert_category(category(2, "Transport"));
    store.insert_transaction(tx(1, TransactionKind::Income, 300_000, day(2024, 1, 5)));
    store.insert_transaction(expense(2, 45_000, day(2024, 1, 10), 1));
    store.insert_transaction(expense(3, 12_000, day(2024, 2, 1), 2));
    store
}

#[tokio::test]
async fn trend_for_2024_has_twelve_months() {
    let store = three_transactions();

    let trend = reports::monthly_trend(&store, USER, 2024, &TransactionFilter::default())
        .await
        .unwrap();

    assert_eq!(trend.len(), 12);
    assert_eq!(trend[0].month, 1);
    assert_eq!(trend[0].income, MoneyCents::new(300_000));
    assert_eq!(trend[0].expenses, MoneyCents::new(45_000));
    assert_eq!(trend[0].balance, MoneyCents::new(255_000));
    assert_eq!(trend[1].income, MoneyCents::ZERO);
    assert_eq!(trend[1].expenses, MoneyCents::new(12_000));
    assert_eq!(trend[1].balance, MoneyCents::new(-12_000));
    for month in &trend[2..] {
        assert!(month.income.is_zero() && month.expenses.is_zero() && month.balance.is_zero());
    }
}

#[tokio::test]
async fn january_breakdown_only_has_food() {
    let store = three_transactions();

    let breakdown = reports::category_breakdown(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::Month {
            year: 2024,
            month: 1,
        },
    )
    .await
    .unwrap();

    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].name, "Food");
    assert_eq!(breakdown[0].amount, MoneyCents::new(45_000));
}

#[tokio::test]
async fn breakdown_is_empty_for_income_filter() {
    let store = three_transactions();
    let filter = TransactionFilter {
        kind: Some(TransactionKind::Income),
        ..TransactionFilter::default()
    };

    let breakdown = reports::category_breakdown(&store, USER, &filter, Period::AllTime)
        .await
        .unwrap();
    assert!(breakdown.is_empty());
}

#[tokio::test]
async fn balance_is_exact_with_cents() {
    let mut store = MemoryStore::new();
    store.insert_transaction(tx(1, TransactionKind::Income, 100_050, day(2024, 3, 1)));
    store.insert_transaction(tx(2, TransactionKind::Income, 25_025, day(2024, 3, 2)));
    store.insert_transaction(tx(3, TransactionKind::Expense, 30_000, day(2024, 3, 3)));

    let summary = reports::balance_summary(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();

    assert_eq!(summary.income.to_string(), "1250.75");
    assert_eq!(summary.expenses.to_string(), "300.00");
    assert_eq!(summary.balance.to_string(), "950.75");
}

#[tokio::test]
async fn empty_ledger_reports_zeros() {
    let store = MemoryStore::new();
    let filter = TransactionFilter::default();

    let summary = reports::balance_summary(&store, USER, &filter, Period::AllTime)
        .await
        .unwrap();
    assert!(summary.income.is_zero());
    assert!(summary.expenses.is_zero());
    assert!(summary.balance.is_zero());
    assert!(summary.recurring_monthly_total.is_zero());
    assert!(summary.available_credit.is_zero());

    let breakdown = reports::category_breakdown(&store, USER, &filter, Period::AllTime)
        .await
        .unwrap();
    assert!(breakdown.is_empty());

    let trend = reports::monthly_trend(&store, USER, 2030, &filter)
        .await
        .unwrap();
    assert_eq!(trend.len(), 12);

    let budgets = reports::budget_utilization(&store, USER, Period::AllTime)
        .await
        .unwrap();
    assert!(budgets.is_empty());
}

#[tokio::test]
async fn identity_filter_matches_everything() {
    let store = three_transactions();
    let composed = TransactionFilter::compose(&FilterParams::default()).unwrap();
    assert!(composed.is_identity());

    let with_identity = reports::balance_summary(&store, USER, &composed, Period::AllTime)
        .await
        .unwrap();
    let unfiltered = reports::balance_summary(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();
    assert_eq!(with_identity, unfiltered);
    assert_eq!(with_identity.income, MoneyCents::new(300_000));
    assert_eq!(with_identity.expenses, MoneyCents::new(57_000));
}

#[tokio::test]
async fn date_bounds_are_inclusive() {
    let store = three_transactions();
    let filter = TransactionFilter::compose(&FilterParams {
        kind: Some("expense".to_string()),
        date_from: Some("2024-01-10".to_string()),
        date_to: Some("2024-02-01".to_string()),
        ..FilterParams::default()
    })
    .unwrap();

    let summary = reports::balance_summary(&store, USER, &filter, Period::AllTime)
        .await
        .unwrap();
    assert!(summary.income.is_zero());
    assert_eq!(summary.expenses, MoneyCents::new(57_000));
}

#[tokio::test]
async fn other_users_rows_are_invisible() {
    let mut store = three_transactions();
    store.insert_transaction(Transaction {
        user_id: "bob".to_string(),
        ..tx(10, TransactionKind::Income, 999_999, day(2024, 1, 1))
    });

    let summary = reports::balance_summary(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();
    assert_eq!(summary.income, MoneyCents::new(300_000));
}

#[tokio::test]
async fn credit_and_recurring_figures() {
    let mut store = MemoryStore::new();
    let card = |id: i64, limit: i64, active: bool| PaymentMethod {
        id,
        user_id: USER.to_string(),
        name: format!("card {id}"),
        kind: PaymentMethodKind::Credit,
        bank: None,
        credit_limit_minor: limit,
        expires_on: None,
        active,
    };
    store.insert_payment_method(card(1, 500_000, true));
    store.insert_payment_method(card(2, 200_000, true));
    store.insert_payment_method(card(3, 900_000, false));
    store.insert_transaction(Transaction {
        payment_method_id: Some(1),
        ..tx(1, TransactionKind::Expense, 120_000, day(2023, 12, 20))
    });
    store.insert_transaction(Transaction {
        payment_method_id: Some(2),
        ..tx(2, TransactionKind::Expense, 50_000, day(2024, 1, 3))
    });
    store.insert_transaction(Transaction {
        payment_method_id: Some(1),
        ..tx(3, TransactionKind::Income, 10_000, day(2024, 1, 4))
    });

    let recurring = |id: i64, cents: i64, status: RecurringStatus| RecurringPayment {
        id,
        user_id: USER.to_string(),
        name: format!("sub {id}"),
        platform: None,
        monthly_amount_minor: cents,
        annual_amount_minor: None,
        payment_method_id: None,
        started_on: day(2023, 1, 1),
        next_renewal_on: day(2024, 2, 1),
        status,
    };
    store.insert_recurring_payment(recurring(1, 1_599, RecurringStatus::Active));
    store.insert_recurring_payment(recurring(2, 999, RecurringStatus::Active));
    store.insert_recurring_payment(recurring(3, 5_000, RecurringStatus::Paused));

    let summary = reports::balance_summary(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::Month {
            year: 2024,
            month: 1,
        },
    )
    .await
    .unwrap();

    // Credit usage ignores the period: card 1 keeps its December charge.
    assert_eq!(summary.available_credit, MoneyCents::new(530_000));
    assert_eq!(summary.recurring_monthly_total, MoneyCents::new(2_598));
    assert_eq!(summary.expenses, MoneyCents::new(50_000));
}

#[tokio::test]
async fn budget_bands_and_zero_plan() {
    let mut store = MemoryStore::new();
    store.insert_category(category(1, "Food"));
    store.insert_category(category(2, "Transport"));
    store.insert_category(category(3, "Fun"));
    let budget = |id: i64, category_id: i64, planned: i64| Budget {
        id,
        user_id: USER.to_string(),
        year: 2024,
        month: 1,
        category_id,
        planned_minor: planned,
    };
    store.insert_budget(budget(1, 1, 10_000));
    store.insert_budget(budget(2, 2, 10_000));
    store.insert_budget(budget(3, 3, 0));
    store.insert_transaction(expense(1, 8_000, day(2024, 1, 2), 1));
    store.insert_transaction(expense(2, 12_345, day(2024, 1, 3), 2));
    store.insert_transaction(expense(3, 4_000, day(2024, 1, 4), 3));
    store.insert_transaction(expense(4, 9_999, day(2024, 2, 1), 1));

    let usage = reports::budget_utilization(
        &store,
        USER,
        Period::Month {
            year: 2024,
            month: 1,
        },
    )
    .await
    .unwrap();
    assert_eq!(usage.len(), 3);

    assert_eq!(usage[0].spent, MoneyCents::new(8_000));
    assert_eq!(usage[0].utilization_pct, dec!(80.00));
    assert_eq!(usage[0].status, BudgetStatus::Warning);

    assert_eq!(usage[1].remaining, MoneyCents::new(-2_345));
    assert_eq!(usage[1].utilization_pct, dec!(123.45));
    assert_eq!(usage[1].status, BudgetStatus::OverBudget);

    assert_eq!(usage[2].utilization_pct, dec!(0));
    assert_eq!(usage[2].status, BudgetStatus::OnTrack);
}

#[tokio::test]
async fn removed_category_disappears_from_reports() {
    let mut store = three_transactions();
    store.insert_budget(Budget {
        id: 1,
        user_id: USER.to_string(),
        year: 2024,
        month: 1,
        category_id: 1,
        planned_minor: 50_000,
    });
    store.remove_category(1);

    let breakdown = reports::category_breakdown(
        &store,
        USER,
        &TransactionFilter::default(),
        Period::AllTime,
    )
    .await
    .unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category_id, 2);

    let usage = reports::budget_utilization(&store, USER, Period::AllTime)
        .await
        .unwrap();
    assert!(usage.is_empty());
}

#[tokio::test]
async fn dashboard_shares_one_period() {
    let store = three_transactions();
    let period = Period::Month {
        year: 2024,
        month: 2,
    };

    let dashboard = reports::dashboard(&store, USER, &TransactionFilter::default(), period)
        .await
        .unwrap();
    assert_eq!(dashboard.period, period);
    assert_eq!(dashboard.summary.expenses, MoneyCents::new(12_000));
    assert_eq!(dashboard.categories.len(), 1);
    assert_eq!(dashboard.categories[0].name, "Transport");
}
