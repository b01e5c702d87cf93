//! Monthly budgets per category.
//!
//! Only the planned amount is stored. What was spent is derived from the
//! ledger every time a report is built.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub category_id: i64,
    pub planned_minor: i64,
}

impl Budget {
    pub fn planned(&self) -> MoneyCents {
        MoneyCents::new(self.planned_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub year: i32,
    pub month: i32,
    pub category_id: i64,
    pub planned_minor: i64,
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
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| EngineError::validation("month", "stored month out of range"))?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            year: model.year,
            month,
            category_id: model.category_id,
            planned_minor: model.planned_minor,
        })
    }
}
