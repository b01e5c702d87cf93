//! Pure reductions from ledger rows to report figures.
//!
//! Nothing here touches a store. Money is summed as integer cents with
//! overflow checks; the only decimal math is the utilization percentage,
//! which is rounded once when the usage row is built.

use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::{
    Budget, Category, MoneyCents, PaymentMethod, RecurringPayment, RecurringStatus, ResultEngine,
    Transaction, TransactionKind,
};

/// Income and expenses of a transaction set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: MoneyCents,
    pub expenses: MoneyCents,
}

impl Totals {
    pub fn balance(&self) -> ResultEngine<MoneyCents> {
        self.income.try_sub(self.expenses)
    }

    fn add(&mut self, tx: &Transaction) -> ResultEngine<()> {
        match tx.kind {
            TransactionKind::Income => self.income = self.income.try_add(tx.amount())?,
            TransactionKind::Expense => self.expenses = self.expenses.try_add(tx.amount())?,
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceSummary {
    pub income: MoneyCents,
    pub expenses: MoneyCents,
    pub balance: MoneyCents,
    pub recurring_monthly_total: MoneyCents,
    pub available_credit: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryAmount {
    pub category_id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthTotals {
    /// Calendar month, `1..=12`.
    pub month: u32,
    pub income: MoneyCents,
    pub expenses: MoneyCents,
    pub balance: MoneyCents,
}

/// Presentation band for budget utilization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    /// `> 100` over budget, `80..=100` warning, below that on track.
    pub fn classify(pct: Decimal) -> Self {
        if pct > Decimal::ONE_HUNDRED {
            Self::OverBudget
        } else if pct >= Decimal::from(80) {
            Self::Warning
        } else {
            Self::OnTrack
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "on_track",
            Self::Warning => "warning",
            Self::OverBudget => "over_budget",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetUsage {
    pub budget_id: i64,
    pub category_id: i64,
    pub category: String,
    pub year: i32,
    pub month: u32,
    pub planned: MoneyCents,
    pub spent: MoneyCents,
    pub remaining: MoneyCents,
    /// Rounded to 2 decimals.
    pub utilization_pct: Decimal,
    pub status: BudgetStatus,
}

pub fn totals<'a, I>(txs: I) -> ResultEngine<Totals>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut out = Totals::default();
    for tx in txs {
        out.add(tx)?;
    }
    Ok(out)
}

/// Sum of monthly amounts over active recurring payments.
pub fn recurring_monthly_total(payments: &[RecurringPayment]) -> ResultEngine<MoneyCents> {
    MoneyCents::try_sum(
        payments
            .iter()
            .filter(|p| p.status == RecurringStatus::Active)
            .map(RecurringPayment::monthly_amount),
    )
}

/// Σ over active credit cards of `limit - spent`, where `spent` is every
/// expense charged to that card in `ledger`.
///
/// A card over its limit contributes a negative amount.
pub fn available_credit(
    methods: &[PaymentMethod],
    ledger: &[Transaction],
) -> ResultEngine<MoneyCents> {
    let mut spent: HashMap<i64, MoneyCents> = HashMap::new();
    for tx in ledger {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        if let Some(method_id) = tx.payment_method_id {
            let entry = spent.entry(method_id).or_default();
            *entry = entry.try_add(tx.amount())?;
        }
    }

    let mut total = MoneyCents::ZERO;
    for card in methods.iter().filter(|m| m.is_active_credit()) {
        let used = spent.get(&card.id).copied().unwrap_or_default();
        total = total.try_add(card.credit_limit().try_sub(used)?)?;
    }
    Ok(total)
}

/// Expenses grouped by category.
///
/// Sparse: categories without expenses are absent, and so are expenses with
/// no (or an unknown) category. Ordered by amount descending, then name.
pub fn category_breakdown(
    txs: &[Transaction],
    categories: &[Category],
) -> ResultEngine<Vec<CategoryAmount>> {
    let mut sums: HashMap<i64, MoneyCents> = HashMap::new();
    for tx in txs {
        if tx.kind != TransactionKind::Expense {
            continue;
        }
        if let Some(category_id) = tx.category_id {
            let entry = sums.entry(category_id).or_default();
            *entry = entry.try_add(tx.amount())?;
        }
    }

    let mut out: Vec<CategoryAmount> = categories
        .iter()
        .filter_map(|category| {
            let amount = sums.get(&category.id).copied()?;
            (!amount.is_zero()).then(|| CategoryAmount {
                category_id: category.id,
                name: category.name.clone(),
                color: category.color.clone(),
                icon: category.icon.clone(),
                amount,
            })
        })
        .collect();

    out.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.name.cmp(&b.name))
            .then(a.category_id.cmp(&b.category_id))
    });
    Ok(out)
}

/// Dense per-month totals for `year`: always 12 entries, January first.
pub fn monthly_trend(year: i32, txs: &[Transaction]) -> ResultEngine<Vec<MonthTotals>> {
    let mut months = [Totals::default(); 12];
    for tx in txs.iter().filter(|tx| tx.occurred_on.year() == year) {
        months[tx.occurred_on.month0() as usize].add(tx)?;
    }

    months
        .iter()
        .zip(1u32..)
        .map(|(totals, month)| {
            Ok(MonthTotals {
                month,
                income: totals.income,
                expenses: totals.expenses,
                balance: totals.balance()?,
            })
        })
        .collect()
}

/// `spent / planned * 100`, unrounded; `0` when nothing was planned.
pub fn utilization_pct(spent: MoneyCents, planned: MoneyCents) -> Decimal {
    if planned.cents() <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(spent.cents()) * Decimal::ONE_HUNDRED / Decimal::from(planned.cents())
}

/// Compare one budget with the expenses of its category in its month.
///
/// `ledger` may hold any transactions; only expenses in the budget's slot
/// count.
pub fn budget_usage(
    budget: &Budget,
    category: Option<&Category>,
    ledger: &[Transaction],
) -> ResultEngine<BudgetUsage> {
    let spent = MoneyCents::try_sum(
        ledger
            .iter()
            .filter(|tx| {
                tx.kind == TransactionKind::Expense
                    && tx.category_id == Some(budget.category_id)
                    && tx.occurred_on.year() == budget.year
                    && tx.occurred_on.month() == budget.month
            })
            .map(Transaction::amount),
    )?;
    let planned = budget.planned();
    let pct = utilization_pct(spent, planned);

    Ok(BudgetUsage {
        budget_id: budget.id,
        category_id: budget.category_id,
        category: category.map(|c| c.name.clone()).unwrap_or_default(),
        year: budget.year,
        month: budget.month,
        planned,
        spent,
        remaining: planned.try_sub(spent)?,
        utilization_pct: pct.round_dp(2),
        status: BudgetStatus::classify(pct),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::PaymentMethodKind;

    fn tx(id: i64, kind: TransactionKind, cents: i64, on: (i32, u32, u32)) -> Transaction {
        Transaction {
            id,
            user_id: "alice".to_string(),
            kind,
            amount_minor: cents,
            occurred_on: NaiveDate::from_ymd_opt(on.0, on.1, on.2).unwrap(),
            category_id: None,
            payment_method_id: None,
            note: None,
            installments: 1,
            installment_index: 1,
            created_at: Utc::now(),
        }
    }

    fn card(id: i64, kind: PaymentMethodKind, limit: i64, active: bool) -> PaymentMethod {
        PaymentMethod {
            id,
            user_id: "alice".to_string(),
            name: format!("card {id}"),
            kind,
            bank: None,
            credit_limit_minor: limit,
            expires_on: None,
            active,
        }
    }

    #[test]
    fn empty_totals_are_zero() {
        let t = totals(&[]).unwrap();
        assert_eq!(t, Totals::default());
        assert_eq!(t.balance().unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn available_credit_sums_every_active_card() {
        let cards = [
            card(1, PaymentMethodKind::Credit, 100_000, true),
            card(2, PaymentMethodKind::Credit, 50_000, true),
            card(3, PaymentMethodKind::Credit, 70_000, false),
            card(4, PaymentMethodKind::Debit, 0, true),
        ];
        let mut a = tx(1, TransactionKind::Expense, 30_000, (2024, 1, 3));
        a.payment_method_id = Some(1);
        let mut b = tx(2, TransactionKind::Expense, 10_000, (2024, 1, 4));
        b.payment_method_id = Some(2);
        let mut refund = tx(3, TransactionKind::Income, 99_999, (2024, 1, 5));
        refund.payment_method_id = Some(1);

        let credit = available_credit(&cards, &[a, b, refund]).unwrap();
        // (100000 - 30000) + (50000 - 10000)
        assert_eq!(credit, MoneyCents::new(110_000));
    }

    #[test]
    fn trend_is_dense() {
        let trend = monthly_trend(2024, &[tx(1, TransactionKind::Income, 500, (2023, 6, 1))]).unwrap();
        assert_eq!(trend.len(), 12);
        assert!(trend.iter().all(|m| m.income.is_zero() && m.expenses.is_zero()));
        assert_eq!(trend[0].month, 1);
        assert_eq!(trend[11].month, 12);
    }

    #[test]
    fn utilization_bands() {
        assert_eq!(BudgetStatus::classify(dec!(100.01)), BudgetStatus::OverBudget);
        assert_eq!(BudgetStatus::classify(dec!(100)), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(dec!(80)), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify(dec!(79.99)), BudgetStatus::OnTrack);
    }

    #[test]
    fn utilization_is_rounded_once() {
        // 1/3 of the plan: 33.333.. rounds to 33.33
        let pct = utilization_pct(MoneyCents::new(100), MoneyCents::new(300));
        assert_eq!(pct.round_dp(2), dec!(33.33));
        assert_eq!(
            utilization_pct(MoneyCents::new(500), MoneyCents::ZERO),
            Decimal::ZERO
        );
    }

    #[test]
    fn band_uses_unrounded_value() {
        // 100.004% rounds to 100.00 for display but is still over budget
        let budget = Budget {
            id: 1,
            user_id: "alice".to_string(),
            year: 2024,
            month: 3,
            category_id: 9,
            planned_minor: 250_000,
        };
        let mut spend = tx(1, TransactionKind::Expense, 250_010, (2024, 3, 2));
        spend.category_id = Some(9);

        let usage = budget_usage(&budget, None, &[spend]).unwrap();
        assert_eq!(usage.utilization_pct, dec!(100.00));
        assert_eq!(usage.status, BudgetStatus::OverBudget);
        assert_eq!(usage.remaining, MoneyCents::new(-10));
    }
}
