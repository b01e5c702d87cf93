//! Recurring payments (memberships and subscriptions).

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringStatus {
    Active,
    Paused,
    Cancelled,
}

impl RecurringStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for RecurringStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::validation(
                "status",
                format!("invalid recurring payment status: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPayment {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub platform: Option<String>,
    pub monthly_amount_minor: i64,
    pub annual_amount_minor: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub started_on: NaiveDate,
    pub next_renewal_on: NaiveDate,
    pub status: RecurringStatus,
}

impl RecurringPayment {
    pub fn monthly_amount(&self) -> MoneyCents {
        MoneyCents::new(self.monthly_amount_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub platform: Option<String>,
    pub monthly_amount_minor: i64,
    pub annual_amount_minor: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub started_on: Date,
    pub next_renewal_on: Date,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PaymentMethod,
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RecurringPayment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            platform: model.platform,
            monthly_amount_minor: model.monthly_amount_minor,
            annual_amount_minor: model.annual_amount_minor,
            payment_method_id: model.payment_method_id,
            started_on: model.started_on,
            next_renewal_on: model.next_renewal_on,
            status: RecurringStatus::try_from(model.status.as_str())?,
        })
    }
}
