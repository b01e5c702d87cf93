//! The ledger store seam.
//!
//! Reports only read through [`LedgerStore`], so they run unchanged against
//! the SQLite-backed [`Engine`] or the in-memory [`MemoryStore`].

use std::future::Future;

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    Budget, Category, Engine, PaymentMethod, Period, RecurringPayment, ResultEngine, Transaction,
    budgets, categories,
    filter::{ApplyTxFilters, TransactionFilter},
    payment_methods, recurring_payments, transactions,
};

/// Read access to one user's ledger.
///
/// Set queries never fail because nothing matched: an empty `Vec` is a valid
/// answer.
pub trait LedgerStore: Sync {
    /// Transactions matching `filter`, newest first (`occurred_on`, then
    /// `created_at`, then `id`, all descending).
    fn transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> impl Future<Output = ResultEngine<Vec<Transaction>>> + Send;

    /// Every category of the user, active or not.
    fn categories(&self, user_id: &str)
    -> impl Future<Output = ResultEngine<Vec<Category>>> + Send;

    fn payment_methods(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Vec<PaymentMethod>>> + Send;

    fn recurring_payments(
        &self,
        user_id: &str,
    ) -> impl Future<Output = ResultEngine<Vec<RecurringPayment>>> + Send;

    /// Budgets whose `(year, month)` falls in `period`.
    fn budgets(
        &self,
        user_id: &str,
        period: Period,
    ) -> impl Future<Output = ResultEngine<Vec<Budget>>> + Send;
}

impl LedgerStore for Engine {
    async fn transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            let tx = Transaction::try_from(model)?;
            if filter.matches_description(&tx) {
                out.push(tx);
            }
        }
        Ok(out)
    }

    async fn categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    async fn payment_methods(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_asc(payment_methods::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(PaymentMethod::try_from)
            .collect()
    }

    async fn recurring_payments(&self, user_id: &str) -> ResultEngine<Vec<RecurringPayment>> {
        recurring_payments::Entity::find()
            .filter(recurring_payments::Column::UserId.eq(user_id))
            .order_by_asc(recurring_payments::Column::NextRenewalOn)
            .order_by_asc(recurring_payments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(RecurringPayment::try_from)
            .collect()
    }

    async fn budgets(&self, user_id: &str, period: Period) -> ResultEngine<Vec<Budget>> {
        let mut query = budgets::Entity::find().filter(budgets::Column::UserId.eq(user_id));
        match period {
            Period::AllTime => {}
            Period::Year(year) => {
                query = query.filter(budgets::Column::Year.eq(year));
            }
            Period::Month { year, month } => {
                query = query
                    .filter(budgets::Column::Year.eq(year))
                    .filter(budgets::Column::Month.eq(month as i32));
            }
        }

        query
            .order_by_asc(budgets::Column::Year)
            .order_by_asc(budgets::Column::Month)
            .order_by_asc(budgets::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }
}

/// In-memory ledger, mainly for tests and tooling.
///
/// Rows are inserted as-is; the caller is responsible for ids and ownership.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    categories: Vec<Category>,
    payment_methods: Vec<PaymentMethod>,
    transactions: Vec<Transaction>,
    recurring_payments: Vec<RecurringPayment>,
    budgets: Vec<Budget>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_category(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub fn insert_payment_method(&mut self, method: PaymentMethod) {
        self.payment_methods.push(method);
    }

    pub fn insert_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn insert_recurring_payment(&mut self, payment: RecurringPayment) {
        self.recurring_payments.push(payment);
    }

    pub fn insert_budget(&mut self, budget: Budget) {
        self.budgets.push(budget);
    }

    /// Remove a category together with its transactions and budgets.
    pub fn remove_category(&mut self, category_id: i64) {
        self.categories.retain(|c| c.id != category_id);
        self.transactions
            .retain(|tx| tx.category_id != Some(category_id));
        self.budgets.retain(|b| b.category_id != category_id);
    }
}

impl LedgerStore for MemoryStore {
    async fn transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut out: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id && filter.matches(tx))
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.occurred_on
                .cmp(&a.occurred_on)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(out)
    }

    async fn categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn payment_methods(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        Ok(self
            .payment_methods
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn recurring_payments(&self, user_id: &str) -> ResultEngine<Vec<RecurringPayment>> {
        Ok(self
            .recurring_payments
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn budgets(&self, user_id: &str, period: Period) -> ResultEngine<Vec<Budget>> {
        Ok(self
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && period.contains_month(b.year, b.month))
            .cloned()
            .collect())
    }
}
