use chrono::Months;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, RecurringPayment, RecurringPaymentCmd, RecurringPaymentUpdate, RecurringStatus,
    ResultEngine, recurring_payments,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_name},
};

use super::{Engine, require_references, with_tx};

async fn require_recurring<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    recurring_id: i64,
) -> ResultEngine<recurring_payments::Model> {
    recurring_payments::Entity::find_by_id(recurring_id)
        .filter(recurring_payments::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("recurring payment {recurring_id}")))
}

impl Engine {
    pub async fn create_recurring_payment(
        &self,
        user_id: &str,
        cmd: RecurringPaymentCmd,
    ) -> ResultEngine<RecurringPayment> {
        let name = normalize_required_name(&cmd.name, "name")?;
        ensure_non_negative(cmd.monthly_amount_minor, "monthly_amount")?;
        if let Some(annual) = cmd.annual_amount_minor {
            ensure_non_negative(annual, "annual_amount")?;
        }

        with_tx!(self, |db_tx| {
            require_references(&db_tx, user_id, None, cmd.payment_method_id).await?;

            let model = recurring_payments::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                platform: ActiveValue::Set(normalize_optional_text(cmd.platform.as_deref())),
                monthly_amount_minor: ActiveValue::Set(cmd.monthly_amount_minor),
                annual_amount_minor: ActiveValue::Set(cmd.annual_amount_minor),
                payment_method_id: ActiveValue::Set(cmd.payment_method_id),
                started_on: ActiveValue::Set(cmd.started_on),
                next_renewal_on: ActiveValue::Set(cmd.next_renewal_on.unwrap_or(cmd.started_on)),
                status: ActiveValue::Set(cmd.status.as_str().to_string()),
            }
            .insert(&db_tx)
            .await?;

            RecurringPayment::try_from(model)
        })
    }

    pub async fn recurring_payment(
        &self,
        user_id: &str,
        recurring_id: i64,
    ) -> ResultEngine<RecurringPayment> {
        let model = require_recurring(&self.database, user_id, recurring_id).await?;
        RecurringPayment::try_from(model)
    }

    /// Recurring payments by next renewal date, optionally one status only.
    pub async fn list_recurring_payments(
        &self,
        user_id: &str,
        status: Option<RecurringStatus>,
    ) -> ResultEngine<Vec<RecurringPayment>> {
        let mut query = recurring_payments::Entity::find()
            .filter(recurring_payments::Column::UserId.eq(user_id));
        if let Some(status) = status {
            query = query.filter(recurring_payments::Column::Status.eq(status.as_str()));
        }
        query
            .order_by_asc(recurring_payments::Column::NextRenewalOn)
            .order_by_asc(recurring_payments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(RecurringPayment::try_from)
            .collect()
    }

    pub async fn update_recurring_payment(
        &self,
        user_id: &str,
        recurring_id: i64,
        update: RecurringPaymentUpdate,
    ) -> ResultEngine<RecurringPayment> {
        with_tx!(self, |db_tx| {
            let model = require_recurring(&db_tx, user_id, recurring_id).await?;
            require_references(&db_tx, user_id, None, update.payment_method_id.flatten()).await?;
            let mut active: recurring_payments::ActiveModel = model.clone().into();

            if let Some(name) = update.name.as_deref() {
                active.name = ActiveValue::Set(normalize_required_name(name, "name")?);
            }
            if let Some(platform) = update.platform {
                active.platform = ActiveValue::Set(normalize_optional_text(platform.as_deref()));
            }
            if let Some(amount) = update.monthly_amount_minor {
                ensure_non_negative(amount, "monthly_amount")?;
                active.monthly_amount_minor = ActiveValue::Set(amount);
            }
            if let Some(annual) = update.annual_amount_minor {
                if let Some(amount) = annual {
                    ensure_non_negative(amount, "annual_amount")?;
                }
                active.annual_amount_minor = ActiveValue::Set(annual);
            }
            if let Some(method_id) = update.payment_method_id {
                active.payment_method_id = ActiveValue::Set(method_id);
            }
            if let Some(started_on) = update.started_on {
                active.started_on = ActiveValue::Set(started_on);
            }
            if let Some(next) = update.next_renewal_on {
                active.next_renewal_on = ActiveValue::Set(next);
            }
            if let Some(status) = update.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            RecurringPayment::try_from(model)
        })
    }

    /// Move the next renewal one calendar month ahead (day clamped to the
    /// month's end). Only active payments renew.
    pub async fn renew_recurring_payment(
        &self,
        user_id: &str,
        recurring_id: i64,
    ) -> ResultEngine<RecurringPayment> {
        with_tx!(self, |db_tx| {
            let model = require_recurring(&db_tx, user_id, recurring_id).await?;
            let current = RecurringPayment::try_from(model.clone())?;
            if current.status != RecurringStatus::Active {
                return Err(EngineError::validation(
                    "status",
                    format!("cannot renew a {} payment", current.status.as_str()),
                ));
            }
            let next = current
                .next_renewal_on
                .checked_add_months(Months::new(1))
                .ok_or_else(|| EngineError::validation("next_renewal_on", "date out of range"))?;

            let mut active: recurring_payments::ActiveModel = model.into();
            active.next_renewal_on = ActiveValue::Set(next);
            let model = active.update(&db_tx).await?;
            RecurringPayment::try_from(model)
        })
    }

    pub async fn delete_recurring_payment(
        &self,
        user_id: &str,
        recurring_id: i64,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_recurring(&db_tx, user_id, recurring_id).await?;
            recurring_payments::Entity::delete_by_id(recurring_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
