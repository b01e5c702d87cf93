use sea_orm::{ConnectionTrait, DatabaseConnection, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine};

mod budgets;
mod categories;
mod payment_methods;
mod recurring_payments;
mod reminders;
mod transactions;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// SQLite-backed ledger.
///
/// The engine is stateless apart from the connection pool, so it can be
/// shared freely between requests.
#[derive(Debug)]
pub struct Engine {
    pub(crate) database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Load a category owned by `user_id`, or fail with `KeyNotFound`.
async fn require_category<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    category_id: i64,
) -> ResultEngine<crate::categories::Model> {
    crate::categories::Entity::find_by_id(category_id)
        .filter(crate::categories::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("category {category_id}")))
}

/// Load a payment method owned by `user_id`, or fail with `KeyNotFound`.
async fn require_payment_method<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    payment_method_id: i64,
) -> ResultEngine<crate::payment_methods::Model> {
    crate::payment_methods::Entity::find_by_id(payment_method_id)
        .filter(crate::payment_methods::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("payment method {payment_method_id}")))
}

/// Check optional references before a write.
async fn require_references<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    category_id: Option<i64>,
    payment_method_id: Option<i64>,
) -> ResultEngine<()> {
    if let Some(id) = category_id {
        require_category(db, user_id, id).await?;
    }
    if let Some(id) = payment_method_id {
        require_payment_method(db, user_id, id).await?;
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
