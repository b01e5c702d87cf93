use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Reminder, ReminderCmd, ReminderStatus, ReminderUpdate, ResultEngine, reminders,
    util::{ensure_non_negative, normalize_required_name},
};

use super::{Engine, require_references, with_tx};

async fn require_reminder<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    reminder_id: i64,
) -> ResultEngine<reminders::Model> {
    reminders::Entity::find_by_id(reminder_id)
        .filter(reminders::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("reminder {reminder_id}")))
}

impl Engine {
    pub async fn create_reminder(&self, user_id: &str, cmd: ReminderCmd) -> ResultEngine<Reminder> {
        let title = normalize_required_name(&cmd.title, "title")?;
        if let Some(amount) = cmd.amount_minor {
            ensure_non_negative(amount, "amount")?;
        }

        with_tx!(self, |db_tx| {
            require_references(&db_tx, user_id, cmd.category_id, cmd.payment_method_id).await?;

            let model = reminders::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id.to_string()),
                title: ActiveValue::Set(title),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                due_on: ActiveValue::Set(cmd.due_on),
                payment_method_id: ActiveValue::Set(cmd.payment_method_id),
                category_id: ActiveValue::Set(cmd.category_id),
                status: ActiveValue::Set(ReminderStatus::Pending.as_str().to_string()),
                priority: ActiveValue::Set(cmd.priority.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;

            Reminder::try_from(model)
        })
    }

    pub async fn reminder(&self, user_id: &str, reminder_id: i64) -> ResultEngine<Reminder> {
        let model = require_reminder(&self.database, user_id, reminder_id).await?;
        Reminder::try_from(model)
    }

    /// Reminders by due date, soonest first.
    pub async fn list_reminders(
        &self,
        user_id: &str,
        status: Option<ReminderStatus>,
    ) -> ResultEngine<Vec<Reminder>> {
        let mut query = reminders::Entity::find().filter(reminders::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(reminders::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_asc(reminders::Column::DueOn)
            .order_by_asc(reminders::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Reminder::try_from)
            .collect()
    }

    pub async fn update_reminder(
        &self,
        user_id: &str,
        reminder_id: i64,
        update: ReminderUpdate,
    ) -> ResultEngine<Reminder> {
        with_tx!(self, |db_tx| {
            let model = require_reminder(&db_tx, user_id, reminder_id).await?;
            require_references(
                &db_tx,
                user_id,
                update.category_id.flatten(),
                update.payment_method_id.flatten(),
            )
            .await?;
            let mut active: reminders::ActiveModel = model.clone().into();

            if let Some(title) = update.title.as_deref() {
                active.title = ActiveValue::Set(normalize_required_name(title, "title")?);
            }
            if let Some(amount) = update.amount_minor {
                if let Some(value) = amount {
                    ensure_non_negative(value, "amount")?;
                }
                active.amount_minor = ActiveValue::Set(amount);
            }
            if let Some(due_on) = update.due_on {
                active.due_on = ActiveValue::Set(due_on);
            }
            if let Some(method_id) = update.payment_method_id {
                active.payment_method_id = ActiveValue::Set(method_id);
            }
            if let Some(category_id) = update.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(status) = update.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(priority) = update.priority {
                active.priority = ActiveValue::Set(priority.as_str().to_string());
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            Reminder::try_from(model)
        })
    }

    /// Mark a reminder as completed. Completing twice is a no-op.
    pub async fn complete_reminder(&self, user_id: &str, reminder_id: i64) -> ResultEngine<Reminder> {
        self.update_reminder(
            user_id,
            reminder_id,
            ReminderUpdate {
                status: Some(ReminderStatus::Completed),
                ..ReminderUpdate::default()
            },
        )
        .await
    }

    pub async fn delete_reminder(&self, user_id: &str, reminder_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_reminder(&db_tx, user_id, reminder_id).await?;
            reminders::Entity::delete_by_id(reminder_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
