use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Budget, BudgetCmd, EngineError, LedgerStore, Period, ResultEngine, budgets,
    util::ensure_non_negative,
};

use super::{Engine, require_category, with_tx};

fn validate_slot(cmd: &BudgetCmd) -> ResultEngine<()> {
    if !(1..=9999).contains(&cmd.year) {
        return Err(EngineError::validation("year", "year must be in 1..=9999"));
    }
    if !(1..=12).contains(&cmd.month) {
        return Err(EngineError::validation("month", "month must be in 1..=12"));
    }
    ensure_non_negative(cmd.planned_minor, "planned")
}

async fn require_budget<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    budget_id: i64,
) -> ResultEngine<budgets::Model> {
    budgets::Entity::find_by_id(budget_id)
        .filter(budgets::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("budget {budget_id}")))
}

async fn find_slot(
    db_tx: &DatabaseTransaction,
    user_id: &str,
    cmd: &BudgetCmd,
) -> ResultEngine<Option<budgets::Model>> {
    Ok(budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user_id))
        .filter(budgets::Column::Year.eq(cmd.year))
        .filter(budgets::Column::Month.eq(cmd.month as i32))
        .filter(budgets::Column::CategoryId.eq(cmd.category_id))
        .one(db_tx)
        .await?)
}

async fn insert_slot(
    db_tx: &DatabaseTransaction,
    user_id: &str,
    cmd: &BudgetCmd,
) -> ResultEngine<Budget> {
    let model = budgets::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id.to_string()),
        year: ActiveValue::Set(cmd.year),
        month: ActiveValue::Set(cmd.month as i32),
        category_id: ActiveValue::Set(cmd.category_id),
        planned_minor: ActiveValue::Set(cmd.planned_minor),
    }
    .insert(db_tx)
    .await?;
    Budget::try_from(model)
}

async fn set_planned(
    db_tx: &DatabaseTransaction,
    model: budgets::Model,
    planned_minor: i64,
) -> ResultEngine<Budget> {
    if model.planned_minor == planned_minor {
        return Budget::try_from(model);
    }
    let mut active: budgets::ActiveModel = model.into();
    active.planned_minor = ActiveValue::Set(planned_minor);
    Budget::try_from(active.update(db_tx).await?)
}

impl Engine {
    /// Create a budget; a second budget for the same month and category is
    /// rejected with `ExistingKey`.
    pub async fn create_budget(&self, user_id: &str, cmd: BudgetCmd) -> ResultEngine<Budget> {
        validate_slot(&cmd)?;
        with_tx!(self, |db_tx| {
            require_category(&db_tx, user_id, cmd.category_id).await?;
            if find_slot(&db_tx, user_id, &cmd).await?.is_some() {
                return Err(EngineError::ExistingKey(format!(
                    "budget {}-{:02} for category {}",
                    cmd.year, cmd.month, cmd.category_id
                )));
            }
            insert_slot(&db_tx, user_id, &cmd).await
        })
    }

    /// Create the budget or replace the planned amount of the existing one.
    pub async fn set_budget(&self, user_id: &str, cmd: BudgetCmd) -> ResultEngine<Budget> {
        validate_slot(&cmd)?;
        with_tx!(self, |db_tx| {
            require_category(&db_tx, user_id, cmd.category_id).await?;
            match find_slot(&db_tx, user_id, &cmd).await? {
                Some(model) => set_planned(&db_tx, model, cmd.planned_minor).await,
                None => insert_slot(&db_tx, user_id, &cmd).await,
            }
        })
    }

    pub async fn budget(&self, user_id: &str, budget_id: i64) -> ResultEngine<Budget> {
        let model = require_budget(&self.database, user_id, budget_id).await?;
        Budget::try_from(model)
    }

    pub async fn list_budgets(&self, user_id: &str, period: Period) -> ResultEngine<Vec<Budget>> {
        LedgerStore::budgets(self, user_id, period).await
    }

    pub async fn update_budget(
        &self,
        user_id: &str,
        budget_id: i64,
        planned_minor: i64,
    ) -> ResultEngine<Budget> {
        ensure_non_negative(planned_minor, "planned")?;
        with_tx!(self, |db_tx| {
            let model = require_budget(&db_tx, user_id, budget_id).await?;
            set_planned(&db_tx, model, planned_minor).await
        })
    }

    pub async fn delete_budget(&self, user_id: &str, budget_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
