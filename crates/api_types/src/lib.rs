use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a patch field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "api_types::double_option")]`:
/// a missing key stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Filter fields of `GET /transactions`, kept as raw strings so a
    /// malformed value is reported with its field name.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub kind: Option<String>,
        pub category_id: Option<String>,
        pub payment_method_id: Option<String>,
        pub date_from: Option<String>,
        pub date_to: Option<String>,
        pub description_contains: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Non-negative, at most two fractional digits. The kind carries the sign.
        pub amount: Decimal,
        pub occurred_on: NaiveDate,
        pub category_id: Option<i64>,
        pub payment_method_id: Option<i64>,
        pub note: Option<String>,
        /// Defaults to 1.
        pub installments: Option<i32>,
        /// 1-based, defaults to 1.
        pub installment_index: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionPatch {
        pub kind: Option<TransactionKind>,
        pub amount: Option<Decimal>,
        pub occurred_on: Option<NaiveDate>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category_id: Option<Option<i64>>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub payment_method_id: Option<Option<i64>>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub note: Option<Option<String>>,
        pub installments: Option<i32>,
        pub installment_index: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub kind: TransactionKind,
        pub amount: Decimal,
        pub occurred_on: NaiveDate,
        pub category_id: Option<i64>,
        pub payment_method_id: Option<i64>,
        pub note: Option<String>,
        pub installments: i32,
        pub installment_index: i32,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;
    use crate::transaction::TransactionKind;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryListQuery {
        pub include_inactive: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: TransactionKind,
        /// `#RRGGBB`, defaults to pink.
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub monthly_budget: Option<Decimal>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryPatch {
        pub name: Option<String>,
        pub kind: Option<TransactionKind>,
        pub color: Option<String>,
        pub icon: Option<String>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub monthly_budget: Option<Option<Decimal>>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
        pub kind: TransactionKind,
        pub color: String,
        pub icon: String,
        pub description: Option<String>,
        pub monthly_budget: Option<Decimal>,
        pub active: bool,
        pub created_at: DateTime<Utc>,
    }
}

pub mod payment_method {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethodKind {
        Cash,
        Debit,
        Credit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodNew {
        pub name: String,
        pub kind: PaymentMethodKind,
        pub bank: Option<String>,
        /// Only credit cards may carry a limit.
        pub credit_limit: Option<Decimal>,
        pub expires_on: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentMethodPatch {
        pub name: Option<String>,
        pub kind: Option<PaymentMethodKind>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub bank: Option<Option<String>>,
        pub credit_limit: Option<Decimal>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub expires_on: Option<Option<NaiveDate>>,
        pub active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: i64,
        pub name: String,
        pub kind: PaymentMethodKind,
        pub bank: Option<String>,
        pub credit_limit: Decimal,
        pub expires_on: Option<NaiveDate>,
        pub active: bool,
    }
}

pub mod recurring {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecurringStatus {
        Active,
        Paused,
        Cancelled,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecurringListQuery {
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringPaymentNew {
        pub name: String,
        pub platform: Option<String>,
        pub monthly_amount: Decimal,
        pub annual_amount: Option<Decimal>,
        pub payment_method_id: Option<i64>,
        pub started_on: NaiveDate,
        /// Defaults to `started_on`.
        pub next_renewal_on: Option<NaiveDate>,
        pub status: Option<RecurringStatus>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecurringPaymentPatch {
        pub name: Option<String>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub platform: Option<Option<String>>,
        pub monthly_amount: Option<Decimal>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub annual_amount: Option<Option<Decimal>>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub payment_method_id: Option<Option<i64>>,
        pub started_on: Option<NaiveDate>,
        pub next_renewal_on: Option<NaiveDate>,
        pub status: Option<RecurringStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringPaymentView {
        pub id: i64,
        pub name: String,
        pub platform: Option<String>,
        pub monthly_amount: Decimal,
        pub annual_amount: Option<Decimal>,
        pub payment_method_id: Option<i64>,
        pub started_on: NaiveDate,
        pub next_renewal_on: NaiveDate,
        pub status: RecurringStatus,
    }
}

pub mod budget {
    use super::*;

    /// `?month=&year=` as raw strings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PeriodQuery {
        pub month: Option<String>,
        pub year: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub year: i32,
        pub month: u32,
        pub category_id: i64,
        pub planned: Decimal,
        /// Replace the planned amount of an existing budget for the same
        /// month and category instead of failing with a conflict.
        #[serde(default)]
        pub replace: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetPatch {
        pub planned: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: i64,
        pub year: i32,
        pub month: u32,
        pub category_id: i64,
        pub planned: Decimal,
    }
}

pub mod reminder {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReminderStatus {
        Pending,
        Completed,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReminderPriority {
        Low,
        Normal,
        High,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReminderListQuery {
        pub status: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderNew {
        pub title: String,
        pub amount: Option<Decimal>,
        pub due_on: NaiveDate,
        pub payment_method_id: Option<i64>,
        pub category_id: Option<i64>,
        pub priority: Option<ReminderPriority>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReminderPatch {
        pub title: Option<String>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub amount: Option<Option<Decimal>>,
        pub due_on: Option<NaiveDate>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub payment_method_id: Option<Option<i64>>,
        #[serde(
            default,
            deserialize_with = "crate::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub category_id: Option<Option<i64>>,
        pub status: Option<ReminderStatus>,
        pub priority: Option<ReminderPriority>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderView {
        pub id: i64,
        pub title: String,
        pub amount: Option<Decimal>,
        pub due_on: NaiveDate,
        pub payment_method_id: Option<i64>,
        pub category_id: Option<i64>,
        pub status: ReminderStatus,
        pub priority: ReminderPriority,
    }
}

pub mod report {
    use super::*;

    /// Filter and period fields of the report routes, as raw strings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub kind: Option<String>,
        pub category_id: Option<String>,
        pub payment_method_id: Option<String>,
        pub date_from: Option<String>,
        pub date_to: Option<String>,
        pub description_contains: Option<String>,
        pub month: Option<String>,
        pub year: Option<String>,
    }

    /// Resolved report period. Both fields are `None` for all time; only
    /// `year` is set for a whole year.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PeriodView {
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub income: Decimal,
        pub expenses: Decimal,
        pub balance: Decimal,
        pub recurring_monthly_total: Decimal,
        pub available_credit: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryAmountView {
        pub category_id: i64,
        pub category: String,
        pub color: String,
        pub icon: String,
        pub amount: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthTotalsView {
        pub month: u32,
        pub income: Decimal,
        pub expenses: Decimal,
        pub balance: Decimal,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetStatus {
        OnTrack,
        Warning,
        OverBudget,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUsageView {
        pub budget_id: i64,
        pub category_id: i64,
        pub category: String,
        pub year: i32,
        pub month: u32,
        pub planned: Decimal,
        pub spent: Decimal,
        pub remaining: Decimal,
        /// Rounded to two decimals.
        pub utilization_pct: Decimal,
        pub status: BudgetStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub period: PeriodView,
        pub summary: SummaryView,
        pub categories: Vec<CategoryAmountView>,
    }
}
