//! Command structs for engine operations.
//!
//! Creation commands carry the required fields in `new` and optional ones
//! through builder methods. Update structs are patches: `None` keeps the
//! stored value, and for nullable columns `Some(None)` clears it.

use chrono::NaiveDate;

use crate::{PaymentMethodKind, RecurringStatus, ReminderPriority, ReminderStatus, TransactionKind};

/// Create a category.
#[derive(Clone, Debug)]
pub struct CategoryCmd {
    pub name: String,
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub monthly_budget_minor: Option<i64>,
}

impl CategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TransactionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            color: None,
            icon: None,
            description: None,
            monthly_budget_minor: None,
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn monthly_budget(mut self, amount_minor: i64) -> Self {
        self.monthly_budget_minor = Some(amount_minor);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub kind: Option<TransactionKind>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<Option<String>>,
    pub monthly_budget_minor: Option<Option<i64>>,
    pub active: Option<bool>,
}

/// Create a payment method.
#[derive(Clone, Debug)]
pub struct PaymentMethodCmd {
    pub name: String,
    pub kind: PaymentMethodKind,
    pub bank: Option<String>,
    pub credit_limit_minor: i64,
    pub expires_on: Option<NaiveDate>,
}

impl PaymentMethodCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PaymentMethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bank: None,
            credit_limit_minor: 0,
            expires_on: None,
        }
    }

    #[must_use]
    pub fn bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }

    #[must_use]
    pub fn credit_limit(mut self, amount_minor: i64) -> Self {
        self.credit_limit_minor = amount_minor;
        self
    }

    #[must_use]
    pub fn expires_on(mut self, date: NaiveDate) -> Self {
        self.expires_on = Some(date);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct PaymentMethodUpdate {
    pub name: Option<String>,
    pub kind: Option<PaymentMethodKind>,
    pub bank: Option<Option<String>>,
    pub credit_limit_minor: Option<i64>,
    pub expires_on: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
}

/// Create an income or expense.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub category_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub note: Option<String>,
    pub installments: i32,
    pub installment_index: i32,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(kind: TransactionKind, amount_minor: i64, occurred_on: NaiveDate) -> Self {
        Self {
            kind,
            amount_minor,
            occurred_on,
            category_id: None,
            payment_method_id: None,
            note: None,
            installments: 1,
            installment_index: 1,
        }
    }

    #[must_use]
    pub fn income(amount_minor: i64, occurred_on: NaiveDate) -> Self {
        Self::new(TransactionKind::Income, amount_minor, occurred_on)
    }

    #[must_use]
    pub fn expense(amount_minor: i64, occurred_on: NaiveDate) -> Self {
        Self::new(TransactionKind::Expense, amount_minor, occurred_on)
    }

    #[must_use]
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method_id: i64) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Installment `index` of `count` (both 1-based).
    #[must_use]
    pub fn installment(mut self, index: i32, count: i32) -> Self {
        self.installment_index = index;
        self.installments = count;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub occurred_on: Option<NaiveDate>,
    pub category_id: Option<Option<i64>>,
    pub payment_method_id: Option<Option<i64>>,
    pub note: Option<Option<String>>,
    pub installments: Option<i32>,
    pub installment_index: Option<i32>,
}

/// Create a recurring payment.
#[derive(Clone, Debug)]
pub struct RecurringPaymentCmd {
    pub name: String,
    pub platform: Option<String>,
    pub monthly_amount_minor: i64,
    pub annual_amount_minor: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub started_on: NaiveDate,
    /// Defaults to `started_on`.
    pub next_renewal_on: Option<NaiveDate>,
    pub status: RecurringStatus,
}

impl RecurringPaymentCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, monthly_amount_minor: i64, started_on: NaiveDate) -> Self {
        Self {
            name: name.into(),
            platform: None,
            monthly_amount_minor,
            annual_amount_minor: None,
            payment_method_id: None,
            started_on,
            next_renewal_on: None,
            status: RecurringStatus::Active,
        }
    }

    #[must_use]
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    #[must_use]
    pub fn annual_amount(mut self, amount_minor: i64) -> Self {
        self.annual_amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method_id: i64) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn next_renewal_on(mut self, date: NaiveDate) -> Self {
        self.next_renewal_on = Some(date);
        self
    }

    #[must_use]
    pub fn status(mut self, status: RecurringStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecurringPaymentUpdate {
    pub name: Option<String>,
    pub platform: Option<Option<String>>,
    pub monthly_amount_minor: Option<i64>,
    pub annual_amount_minor: Option<Option<i64>>,
    pub payment_method_id: Option<Option<i64>>,
    pub started_on: Option<NaiveDate>,
    pub next_renewal_on: Option<NaiveDate>,
    pub status: Option<RecurringStatus>,
}

/// Plan an amount for one category in one month.
#[derive(Clone, Debug)]
pub struct BudgetCmd {
    pub year: i32,
    pub month: u32,
    pub category_id: i64,
    pub planned_minor: i64,
}

impl BudgetCmd {
    #[must_use]
    pub fn new(year: i32, month: u32, category_id: i64, planned_minor: i64) -> Self {
        Self {
            year,
            month,
            category_id,
            planned_minor,
        }
    }
}

/// Create a payment reminder.
#[derive(Clone, Debug)]
pub struct ReminderCmd {
    pub title: String,
    pub due_on: NaiveDate,
    pub amount_minor: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub category_id: Option<i64>,
    pub priority: ReminderPriority,
}

impl ReminderCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, due_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            due_on,
            amount_minor: None,
            payment_method_id: None,
            category_id: None,
            priority: ReminderPriority::default(),
        }
    }

    #[must_use]
    pub fn amount(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method_id: i64) -> Self {
        self.payment_method_id = Some(payment_method_id);
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: ReminderPriority) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReminderUpdate {
    pub title: Option<String>,
    pub amount_minor: Option<Option<i64>>,
    pub due_on: Option<NaiveDate>,
    pub payment_method_id: Option<Option<i64>>,
    pub category_id: Option<Option<i64>>,
    pub status: Option<ReminderStatus>,
    pub priority: Option<ReminderPriority>,
}
