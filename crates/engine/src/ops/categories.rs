use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    Category, CategoryCmd, CategoryUpdate, EngineError, ResultEngine, budgets, categories,
    categories::{DEFAULT_COLOR, DEFAULT_ICON},
    reminders, transactions,
    util::{
        ensure_non_negative, normalize_category_key, normalize_color, normalize_optional_text,
        normalize_required_name,
    },
};

use super::{Engine, require_category, with_tx};

impl Engine {
    /// Create a category. Names are unique per user, ignoring case and accents.
    pub async fn create_category(&self, user_id: &str, cmd: CategoryCmd) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "name")?;
        let name_norm = normalize_category_key(&name)?;
        let color = match cmd.color.as_deref() {
            Some(color) => normalize_color(color)?,
            None => DEFAULT_COLOR.to_string(),
        };
        let icon =
            normalize_optional_text(cmd.icon.as_deref()).unwrap_or_else(|| DEFAULT_ICON.to_string());
        if let Some(amount) = cmd.monthly_budget_minor {
            ensure_non_negative(amount, "monthly_budget")?;
        }

        with_tx!(self, |db_tx| {
            ensure_name_free(&db_tx, user_id, &name, &name_norm, None).await?;

            let model = categories::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                color: ActiveValue::Set(color),
                icon: ActiveValue::Set(icon),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                monthly_budget_minor: ActiveValue::Set(cmd.monthly_budget_minor),
                active: ActiveValue::Set(true),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Category::try_from(model)
        })
    }

    pub async fn category(&self, user_id: &str, category_id: i64) -> ResultEngine<Category> {
        let model = require_category(&self.database, user_id, category_id).await?;
        Category::try_from(model)
    }

    /// Categories ordered by name; inactive ones only on request.
    pub async fn list_categories(
        &self,
        user_id: &str,
        include_inactive: bool,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find().filter(categories::Column::UserId.eq(user_id));
        if !include_inactive {
            query = query.filter(categories::Column::Active.eq(true));
        }
        query
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: i64,
        update: CategoryUpdate,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = require_category(&db_tx, user_id, category_id).await?;
            let mut active: categories::ActiveModel = model.clone().into();

            if let Some(name) = update.name.as_deref() {
                let name = normalize_required_name(name, "name")?;
                let name_norm = normalize_category_key(&name)?;
                ensure_name_free(&db_tx, user_id, &name, &name_norm, Some(category_id)).await?;
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(kind) = update.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(color) = update.color.as_deref() {
                active.color = ActiveValue::Set(normalize_color(color)?);
            }
            if let Some(icon) = normalize_optional_text(update.icon.as_deref()) {
                active.icon = ActiveValue::Set(icon);
            }
            if let Some(description) = update.description {
                active.description =
                    ActiveValue::Set(normalize_optional_text(description.as_deref()));
            }
            if let Some(budget) = update.monthly_budget_minor {
                if let Some(amount) = budget {
                    ensure_non_negative(amount, "monthly_budget")?;
                }
                active.monthly_budget_minor = ActiveValue::Set(budget);
            }
            if let Some(flag) = update.active {
                active.active = ActiveValue::Set(flag);
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            Category::try_from(model)
        })
    }

    /// Delete a category together with its transactions and budgets.
    ///
    /// Reminders pointing at it keep existing without a category.
    pub async fn delete_category(&self, user_id: &str, category_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_category(&db_tx, user_id, category_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            budgets::Entity::delete_many()
                .filter(budgets::Column::UserId.eq(user_id))
                .filter(budgets::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            reminders::Entity::update_many()
                .col_expr(reminders::Column::CategoryId, Expr::value(Option::<i64>::None))
                .filter(reminders::Column::UserId.eq(user_id))
                .filter(reminders::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}

async fn ensure_name_free(
    db_tx: &DatabaseTransaction,
    user_id: &str,
    display: &str,
    name_norm: &str,
    except: Option<i64>,
) -> ResultEngine<()> {
    let mut query = categories::Entity::find()
        .filter(categories::Column::UserId.eq(user_id))
        .filter(categories::Column::NameNorm.eq(name_norm));
    if let Some(id) = except {
        query = query.filter(categories::Column::Id.ne(id));
    }
    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(display.to_string()));
    }
    Ok(())
}
