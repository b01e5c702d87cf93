//! Ledger transactions.
//!
//! A `Transaction` is a single income or expense. The amount is always
//! non-negative; `kind` decides whether it adds to income or expenses.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses user input, ignoring case and surrounding whitespace.
    pub fn parse(value: &str, field: &'static str) -> Result<Self, EngineError> {
        Self::try_from(value.trim().to_ascii_lowercase().as_str())
            .map_err(|_| EngineError::validation(field, format!("unknown kind '{value}'")))
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::validation(
                "kind",
                format!("invalid transaction kind: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub occurred_on: NaiveDate,
    pub category_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub note: Option<String>,
    pub installments: i32,
    pub installment_index: i32,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn amount(&self) -> MoneyCents {
        MoneyCents::new(self.amount_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub category_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub note: Option<String>,
    pub installments: i32,
    pub installment_index: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PaymentMethod,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            occurred_on: model.occurred_on,
            category_id: model.category_id,
            payment_method_id: model.payment_method_id,
            note: model.note,
            installments: model.installments,
            installment_index: model.installment_index,
            created_at: model.created_at,
        })
    }
}
