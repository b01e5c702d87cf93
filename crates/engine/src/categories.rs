//! Category registry per user.
//!
//! Names are unique per owner once folded by case and accents (`name_norm`).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, TransactionKind};

pub const DEFAULT_COLOR: &str = "#FF69B4";
pub const DEFAULT_ICON: &str = "🐱";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub kind: TransactionKind,
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
    pub monthly_budget_minor: Option<i64>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub name_norm: String,
    pub kind: String,
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
    pub monthly_budget_minor: Option<i64>,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::budgets::Entity")]
    Budgets,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            color: model.color,
            icon: model.icon,
            description: model.description,
            monthly_budget_minor: model.monthly_budget_minor,
            active: model.active,
            created_at: model.created_at,
        })
    }
}
