//! Ledger engine of Finanzas Gatunas.
//!
//! The engine owns the persisted ledger (categories, payment methods,
//! transactions, recurring payments, budgets and reminders) and the report
//! builders that reduce it to summaries, breakdowns, trends and budget
//! utilization. Every operation is scoped to a `user_id`.

pub use aggregate::{
    BalanceSummary, BudgetStatus, BudgetUsage, CategoryAmount, MonthTotals, Totals,
};
pub use budgets::Budget;
pub use categories::{Category, DEFAULT_COLOR, DEFAULT_ICON};
pub use commands::{
    BudgetCmd, CategoryCmd, CategoryUpdate, PaymentMethodCmd, PaymentMethodUpdate,
    RecurringPaymentCmd, RecurringPaymentUpdate, ReminderCmd, ReminderUpdate, TransactionCmd,
    TransactionUpdate,
};
pub use error::EngineError;
pub use filter::{FilterParams, TransactionFilter, parse_date};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use payment_methods::{PaymentMethod, PaymentMethodKind};
pub use period::{Period, PeriodParams, parse_month, parse_year};
pub use recurring_payments::{RecurringPayment, RecurringStatus};
pub use reminders::{Reminder, ReminderPriority, ReminderStatus};
pub use reports::Dashboard;
pub use store::{LedgerStore, MemoryStore};
pub use transactions::{Transaction, TransactionKind};
pub use util::parse_id;

pub mod aggregate;
mod budgets;
mod categories;
mod commands;
mod error;
mod filter;
mod money;
mod ops;
mod payment_methods;
mod period;
mod recurring_payments;
mod reminders;
pub mod reports;
mod store;
mod transactions;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
