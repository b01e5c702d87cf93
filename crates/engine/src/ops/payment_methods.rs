use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, Func},
};

use crate::{
    EngineError, PaymentMethod, PaymentMethodCmd, PaymentMethodKind, PaymentMethodUpdate,
    ResultEngine, payment_methods, recurring_payments, reminders, transactions,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_name},
};

use super::{Engine, require_payment_method, with_tx};

fn validate_limit(kind: PaymentMethodKind, credit_limit_minor: i64) -> ResultEngine<()> {
    ensure_non_negative(credit_limit_minor, "credit_limit")?;
    if kind != PaymentMethodKind::Credit && credit_limit_minor != 0 {
        return Err(EngineError::validation(
            "credit_limit",
            "only credit cards have a credit limit",
        ));
    }
    Ok(())
}

impl Engine {
    pub async fn create_payment_method(
        &self,
        user_id: &str,
        cmd: PaymentMethodCmd,
    ) -> ResultEngine<PaymentMethod> {
        let name = normalize_required_name(&cmd.name, "name")?;
        validate_limit(cmd.kind, cmd.credit_limit_minor)?;

        with_tx!(self, |db_tx| {
            ensure_name_free(&db_tx, user_id, &name, None).await?;

            let model = payment_methods::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                bank: ActiveValue::Set(normalize_optional_text(cmd.bank.as_deref())),
                credit_limit_minor: ActiveValue::Set(cmd.credit_limit_minor),
                expires_on: ActiveValue::Set(cmd.expires_on),
                active: ActiveValue::Set(true),
            }
            .insert(&db_tx)
            .await?;

            PaymentMethod::try_from(model)
        })
    }

    pub async fn payment_method(
        &self,
        user_id: &str,
        payment_method_id: i64,
    ) -> ResultEngine<PaymentMethod> {
        let model = require_payment_method(&self.database, user_id, payment_method_id).await?;
        PaymentMethod::try_from(model)
    }

    pub async fn list_payment_methods(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        payment_methods::Entity::find()
            .filter(payment_methods::Column::UserId.eq(user_id))
            .order_by_asc(payment_methods::Column::Name)
            .order_by_asc(payment_methods::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(PaymentMethod::try_from)
            .collect()
    }

    /// Patch a payment method. The limit rule is checked on the merged
    /// result, so switching a card to debit requires clearing its limit.
    pub async fn update_payment_method(
        &self,
        user_id: &str,
        payment_method_id: i64,
        update: PaymentMethodUpdate,
    ) -> ResultEngine<PaymentMethod> {
        with_tx!(self, |db_tx| {
            let model = require_payment_method(&db_tx, user_id, payment_method_id).await?;
            let current = PaymentMethod::try_from(model.clone())?;
            let mut active: payment_methods::ActiveModel = model.clone().into();

            if let Some(name) = update.name.as_deref() {
                let name = normalize_required_name(name, "name")?;
                ensure_name_free(&db_tx, user_id, &name, Some(payment_method_id)).await?;
                active.name = ActiveValue::Set(name);
            }

            let kind = update.kind.unwrap_or(current.kind);
            let limit = update
                .credit_limit_minor
                .unwrap_or(current.credit_limit_minor);
            validate_limit(kind, limit)?;
            if update.kind.is_some() {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if update.credit_limit_minor.is_some() {
                active.credit_limit_minor = ActiveValue::Set(limit);
            }

            if let Some(bank) = update.bank {
                active.bank = ActiveValue::Set(normalize_optional_text(bank.as_deref()));
            }
            if let Some(expires_on) = update.expires_on {
                active.expires_on = ActiveValue::Set(expires_on);
            }
            if let Some(flag) = update.active {
                active.active = ActiveValue::Set(flag);
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            PaymentMethod::try_from(model)
        })
    }

    /// Delete a payment method. Transactions, recurring payments and
    /// reminders that used it are kept with the reference cleared.
    pub async fn delete_payment_method(
        &self,
        user_id: &str,
        payment_method_id: i64,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_payment_method(&db_tx, user_id, payment_method_id).await?;

            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::PaymentMethodId,
                    Expr::value(Option::<i64>::None),
                )
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::PaymentMethodId.eq(payment_method_id))
                .exec(&db_tx)
                .await?;
            recurring_payments::Entity::update_many()
                .col_expr(
                    recurring_payments::Column::PaymentMethodId,
                    Expr::value(Option::<i64>::None),
                )
                .filter(recurring_payments::Column::UserId.eq(user_id))
                .filter(recurring_payments::Column::PaymentMethodId.eq(payment_method_id))
                .exec(&db_tx)
                .await?;
            reminders::Entity::update_many()
                .col_expr(
                    reminders::Column::PaymentMethodId,
                    Expr::value(Option::<i64>::None),
                )
                .filter(reminders::Column::UserId.eq(user_id))
                .filter(reminders::Column::PaymentMethodId.eq(payment_method_id))
                .exec(&db_tx)
                .await?;
            payment_methods::Entity::delete_by_id(payment_method_id)
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}

/// Payment method names are unique per user, case-insensitively.
async fn ensure_name_free(
    db_tx: &DatabaseTransaction,
    user_id: &str,
    name: &str,
    except: Option<i64>,
) -> ResultEngine<()> {
    let mut query = payment_methods::Entity::find()
        .filter(payment_methods::Column::UserId.eq(user_id))
        .filter(
            Expr::expr(Func::lower(Expr::col(payment_methods::Column::Name)))
                .eq(name.to_lowercase()),
        );
    if let Some(id) = except {
        query = query.filter(payment_methods::Column::Id.ne(id));
    }
    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}
