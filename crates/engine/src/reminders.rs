//! Payment reminders.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Completed,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for ReminderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::validation(
                "status",
                format!("invalid reminder status: {other}"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl ReminderPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for ReminderPriority {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(EngineError::validation(
                "priority",
                format!("invalid reminder priority: {other}"),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub amount_minor: Option<i64>,
    pub due_on: NaiveDate,
    pub payment_method_id: Option<i64>,
    pub category_id: Option<i64>,
    pub status: ReminderStatus,
    pub priority: ReminderPriority,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub amount_minor: Option<i64>,
    pub due_on: Date,
    pub payment_method_id: Option<i64>,
    pub category_id: Option<i64>,
    pub status: String,
    pub priority: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Reminder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            amount_minor: model.amount_minor,
            due_on: model.due_on,
            payment_method_id: model.payment_method_id,
            category_id: model.category_id,
            status: ReminderStatus::try_from(model.status.as_str())?,
            priority: ReminderPriority::try_from(model.priority.as_str())?,
        })
    }
}
