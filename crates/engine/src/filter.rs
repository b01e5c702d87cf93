//! Transaction filters.
//!
//! Raw, optional filter fields (as they arrive from a query string) are
//! composed into a typed [`TransactionFilter`]. The same filter drives the
//! listing endpoint and every aggregation, both against SQL (through
//! [`ApplyTxFilters`]) and in memory (through [`TransactionFilter::matches`]).
//!
//! All fields combine with AND. Date bounds are inclusive on both ends.

use chrono::NaiveDate;
use sea_orm::{QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions, util};

/// Raw filter fields. Empty or blank strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub kind: Option<String>,
    pub category_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub description_contains: Option<String>,
}

/// Composed transaction predicate.
///
/// The default value is the identity filter: it matches every transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i64>,
    pub payment_method_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Lower-cased needle.
    pub description_contains: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse an ISO `YYYY-MM-DD` date, naming the field on failure.
pub fn parse_date(value: &str, field: &'static str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        EngineError::validation(field, format!("'{value}' is not a YYYY-MM-DD date"))
    })
}

impl TransactionFilter {
    /// Build a filter from raw fields.
    ///
    /// A malformed field is reported as a validation error naming it; it is
    /// never dropped silently.
    pub fn compose(params: &FilterParams) -> ResultEngine<Self> {
        let kind = present(&params.kind)
            .map(|raw| TransactionKind::parse(raw, "kind"))
            .transpose()?;
        let category_id = present(&params.category_id)
            .map(|raw| util::parse_id(raw, "category_id"))
            .transpose()?;
        let payment_method_id = present(&params.payment_method_id)
            .map(|raw| util::parse_id(raw, "payment_method_id"))
            .transpose()?;
        let date_from = present(&params.date_from)
            .map(|raw| parse_date(raw, "date_from"))
            .transpose()?;
        let date_to = present(&params.date_to)
            .map(|raw| parse_date(raw, "date_to"))
            .transpose()?;
        if let (Some(from), Some(to)) = (date_from, date_to)
            && from > to
        {
            return Err(EngineError::validation(
                "date_from",
                "date_from must not be after date_to",
            ));
        }
        let description_contains = present(&params.description_contains).map(str::to_lowercase);

        Ok(Self {
            kind,
            category_id,
            payment_method_id,
            date_from,
            date_to,
            description_contains,
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_date_bounds(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Intersect the date bounds with `[from, to]`. Bounds only ever tighten.
    #[must_use]
    pub fn within(&self, from: NaiveDate, to: NaiveDate) -> Self {
        let mut out = self.clone();
        out.date_from = Some(self.date_from.map_or(from, |d| d.max(from)));
        out.date_to = Some(self.date_to.map_or(to, |d| d.min(to)));
        out
    }

    /// Restrict to one kind. Returns `None` when the filter already asks for
    /// the other kind, i.e. the result set is necessarily empty.
    pub fn restricted_to(&self, kind: TransactionKind) -> Option<Self> {
        match self.kind {
            Some(current) if current != kind => None,
            _ => Some(Self {
                kind: Some(kind),
                ..self.clone()
            }),
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_columns(tx) && self.matches_description(tx)
    }

    fn matches_columns(&self, tx: &Transaction) -> bool {
        self.kind.is_none_or(|kind| tx.kind == kind)
            && self
                .category_id
                .is_none_or(|id| tx.category_id == Some(id))
            && self
                .payment_method_id
                .is_none_or(|id| tx.payment_method_id == Some(id))
            && self.date_from.is_none_or(|from| tx.occurred_on >= from)
            && self.date_to.is_none_or(|to| tx.occurred_on <= to)
    }

    /// Case-insensitive substring match against the note.
    ///
    /// Evaluated in Rust for every store so Unicode case folding is the same
    /// everywhere (SQLite `LOWER` only folds ASCII).
    pub fn matches_description(&self, tx: &Transaction) -> bool {
        match &self.description_contains {
            None => true,
            Some(needle) => tx
                .note
                .as_deref()
                .is_some_and(|note| note.to_lowercase().contains(needle.as_str())),
        }
    }
}

/// Applies the column constraints of a [`TransactionFilter`] to a query.
///
/// The description needle is not part of it; see
/// [`TransactionFilter::matches_description`].
pub(crate) trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(method_id) = filter.payment_method_id {
            self = self.filter(transactions::Column::PaymentMethodId.eq(method_id));
        }
        if let Some(from) = filter.date_from {
            self = self.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            self = self.filter(transactions::Column::OccurredOn.lte(to));
        }
        self
    }
}
