use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, LedgerStore, ResultEngine, Transaction, TransactionCmd, TransactionFilter,
    TransactionUpdate, transactions,
    util::{ensure_non_negative, normalize_optional_text},
};

use super::{Engine, require_references, with_tx};

fn validate_installments(installments: i32, installment_index: i32) -> ResultEngine<()> {
    if installments < 1 {
        return Err(EngineError::validation("installments", "must be >= 1"));
    }
    if !(1..=installments).contains(&installment_index) {
        return Err(EngineError::validation(
            "installment_index",
            format!("must be between 1 and {installments}"),
        ));
    }
    Ok(())
}

async fn require_transaction<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    transaction_id: i64,
) -> ResultEngine<transactions::Model> {
    transactions::Entity::find_by_id(transaction_id)
        .filter(transactions::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("transaction {transaction_id}")))
}

impl Engine {
    /// Record an income or expense.
    ///
    /// Category and payment method, when given, must belong to the same user.
    pub async fn create_transaction(
        &self,
        user_id: &str,
        cmd: TransactionCmd,
    ) -> ResultEngine<Transaction> {
        ensure_non_negative(cmd.amount_minor, "amount")?;
        validate_installments(cmd.installments, cmd.installment_index)?;

        with_tx!(self, |db_tx| {
            require_references(&db_tx, user_id, cmd.category_id, cmd.payment_method_id).await?;

            let model = transactions::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id.to_string()),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                occurred_on: ActiveValue::Set(cmd.occurred_on),
                category_id: ActiveValue::Set(cmd.category_id),
                payment_method_id: ActiveValue::Set(cmd.payment_method_id),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                installments: ActiveValue::Set(cmd.installments),
                installment_index: ActiveValue::Set(cmd.installment_index),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;

            Transaction::try_from(model)
        })
    }

    pub async fn transaction(&self, user_id: &str, transaction_id: i64) -> ResultEngine<Transaction> {
        let model = require_transaction(&self.database, user_id, transaction_id).await?;
        Transaction::try_from(model)
    }

    /// Filtered listing, newest first. No match is an empty list.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        LedgerStore::transactions(self, user_id, filter).await
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: i64,
        update: TransactionUpdate,
    ) -> ResultEngine<Transaction> {
        if let Some(amount) = update.amount_minor {
            ensure_non_negative(amount, "amount")?;
        }

        with_tx!(self, |db_tx| {
            let model = require_transaction(&db_tx, user_id, transaction_id).await?;
            validate_installments(
                update.installments.unwrap_or(model.installments),
                update.installment_index.unwrap_or(model.installment_index),
            )?;
            require_references(
                &db_tx,
                user_id,
                update.category_id.flatten(),
                update.payment_method_id.flatten(),
            )
            .await?;

            let mut active: transactions::ActiveModel = model.clone().into();
            if let Some(kind) = update.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(amount) = update.amount_minor {
                active.amount_minor = ActiveValue::Set(amount);
            }
            if let Some(occurred_on) = update.occurred_on {
                active.occurred_on = ActiveValue::Set(occurred_on);
            }
            if let Some(category_id) = update.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(method_id) = update.payment_method_id {
                active.payment_method_id = ActiveValue::Set(method_id);
            }
            if let Some(note) = update.note {
                active.note = ActiveValue::Set(normalize_optional_text(note.as_deref()));
            }
            if let Some(installments) = update.installments {
                active.installments = ActiveValue::Set(installments);
            }
            if let Some(index) = update.installment_index {
                active.installment_index = ActiveValue::Set(index);
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            Transaction::try_from(model)
        })
    }

    pub async fn delete_transaction(&self, user_id: &str, transaction_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_transaction(&db_tx, user_id, transaction_id).await?;
            transactions::Entity::delete_by_id(transaction_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
