//! Report builders.
//!
//! Each report reads through a [`LedgerStore`] and reduces the rows with the
//! functions in [`crate::aggregate`]. A period narrows the transaction
//! filter; it never widens bounds the caller already set.

use std::collections::HashMap;

use crate::{
    LedgerStore, MoneyCents, Period, ResultEngine, TransactionFilter, TransactionKind,
    aggregate::{self, BalanceSummary, BudgetUsage, CategoryAmount, MonthTotals},
};

/// Balance summary and expense breakdown computed for the same period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub period: Period,
    pub summary: BalanceSummary,
    pub categories: Vec<CategoryAmount>,
}

fn scoped(filter: &TransactionFilter, period: Period) -> TransactionFilter {
    match period.range() {
        Some((from, to)) => filter.within(from, to),
        None => filter.clone(),
    }
}

/// Income, expenses and balance of the filtered set, plus the recurring
/// monthly total and the credit still available on active credit cards.
///
/// Credit usage looks at every expense ever charged to a card, regardless of
/// the filter.
pub async fn balance_summary<S: LedgerStore>(
    store: &S,
    user_id: &str,
    filter: &TransactionFilter,
    period: Period,
) -> ResultEngine<BalanceSummary> {
    let txs = store.transactions(user_id, &scoped(filter, period)).await?;
    let totals = aggregate::totals(&txs)?;

    let recurring = store.recurring_payments(user_id).await?;
    let recurring_monthly_total = aggregate::recurring_monthly_total(&recurring)?;

    let methods = store.payment_methods(user_id).await?;
    let available_credit = if methods.iter().any(|m| m.is_active_credit()) {
        let charged = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            ..TransactionFilter::default()
        };
        let ledger = store.transactions(user_id, &charged).await?;
        aggregate::available_credit(&methods, &ledger)?
    } else {
        MoneyCents::ZERO
    };

    Ok(BalanceSummary {
        income: totals.income,
        expenses: totals.expenses,
        balance: totals.balance()?,
        recurring_monthly_total,
        available_credit,
    })
}

/// Expenses per category for the period, largest first.
///
/// A filter asking for income only yields an empty breakdown.
pub async fn category_breakdown<S: LedgerStore>(
    store: &S,
    user_id: &str,
    filter: &TransactionFilter,
    period: Period,
) -> ResultEngine<Vec<CategoryAmount>> {
    let Some(expenses) = scoped(filter, period).restricted_to(TransactionKind::Expense) else {
        return Ok(Vec::new());
    };
    let txs = store.transactions(user_id, &expenses).await?;
    if txs.is_empty() {
        return Ok(Vec::new());
    }
    let categories = store.categories(user_id).await?;
    aggregate::category_breakdown(&txs, &categories)
}

/// Twelve monthly totals for `year`, zero-filled.
pub async fn monthly_trend<S: LedgerStore>(
    store: &S,
    user_id: &str,
    year: i32,
    filter: &TransactionFilter,
) -> ResultEngine<Vec<MonthTotals>> {
    let txs = store
        .transactions(user_id, &scoped(filter, Period::Year(year)))
        .await?;
    aggregate::monthly_trend(year, &txs)
}

/// Planned vs. spent for every budget in the period.
///
/// `spent` is recomputed from the ledger on every call.
pub async fn budget_utilization<S: LedgerStore>(
    store: &S,
    user_id: &str,
    period: Period,
) -> ResultEngine<Vec<BudgetUsage>> {
    let budgets = store.budgets(user_id, period).await?;
    if budgets.is_empty() {
        return Ok(Vec::new());
    }

    let categories: HashMap<i64, _> = store
        .categories(user_id)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let expenses = TransactionFilter {
        kind: Some(TransactionKind::Expense),
        ..TransactionFilter::default()
    };
    let ledger = store
        .transactions(user_id, &scoped(&expenses, period))
        .await?;

    budgets
        .iter()
        .map(|budget| {
            aggregate::budget_usage(budget, categories.get(&budget.category_id), &ledger)
        })
        .collect()
}

/// Summary and breakdown over one period.
pub async fn dashboard<S: LedgerStore>(
    store: &S,
    user_id: &str,
    filter: &TransactionFilter,
    period: Period,
) -> ResultEngine<Dashboard> {
    let summary = balance_summary(store, user_id, filter, period).await?;
    let categories = category_breakdown(store, user_id, filter, period).await?;
    Ok(Dashboard {
        period,
        summary,
        categories,
    })
}
