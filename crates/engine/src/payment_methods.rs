//! Payment methods ("cards").
//!
//! Only credit cards carry a limit; available credit is derived from it.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Cash,
    Debit,
    Credit,
}

impl PaymentMethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for PaymentMethodKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(EngineError::validation(
                "kind",
                format!("invalid payment method kind: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub kind: PaymentMethodKind,
    pub bank: Option<String>,
    pub credit_limit_minor: i64,
    pub expires_on: Option<NaiveDate>,
    pub active: bool,
}

impl PaymentMethod {
    pub fn credit_limit(&self) -> MoneyCents {
        MoneyCents::new(self.credit_limit_minor)
    }

    /// Active credit cards are the only ones that count toward available
    /// credit.
    pub fn is_active_credit(&self) -> bool {
        self.active && self.kind == PaymentMethodKind::Credit
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub bank: Option<String>,
    pub credit_limit_minor: i64,
    pub expires_on: Option<Date>,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PaymentMethod {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: PaymentMethodKind::try_from(model.kind.as_str())?,
            bank: model.bank,
            credit_limit_minor: model.credit_limit_minor,
            expires_on: model.expires_on,
            active: model.active,
        })
    }
}
