//! Reporting periods.
//!
//! A period comes in as two optional raw strings (`month`, `year`). Only a
//! parameter that is truly absent may fall back to a default; anything that
//! is present but malformed is a validation error.

use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Raw period fields. Empty or blank strings count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodParams {
    pub month: Option<String>,
    pub year: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    AllTime,
    Month { year: i32, month: u32 },
    Year(i32),
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a calendar year in `1..=9999`.
pub fn parse_year(value: &str) -> ResultEngine<i32> {
    match value.trim().parse::<i32>() {
        Ok(year) if (1..=9999).contains(&year) => Ok(year),
        Ok(_) => Err(EngineError::validation("year", "year must be in 1..=9999")),
        Err(_) => Err(EngineError::validation(
            "year",
            format!("'{value}' is not a numeric year"),
        )),
    }
}

/// Parse a calendar month in `1..=12`.
pub fn parse_month(value: &str) -> ResultEngine<u32> {
    match value.trim().parse::<u32>() {
        Ok(month) if (1..=12).contains(&month) => Ok(month),
        Ok(_) => Err(EngineError::validation("month", "month must be in 1..=12")),
        Err(_) => Err(EngineError::validation(
            "month",
            format!("'{value}' is not a numeric month"),
        )),
    }
}

impl Period {
    /// The month containing `day`.
    pub fn month_of(day: NaiveDate) -> Self {
        Self::Month {
            year: day.year(),
            month: day.month(),
        }
    }

    /// Resolve raw fields against `today`.
    ///
    /// | month | year | result |
    /// |---|---|---|
    /// | absent | absent | `default` |
    /// | absent | given | whole year |
    /// | given | absent | that month of `today`'s year |
    /// | given | given | that month |
    pub fn resolve(params: &PeriodParams, today: NaiveDate, default: Period) -> ResultEngine<Self> {
        let month = present(&params.month).map(parse_month).transpose()?;
        let year = present(&params.year).map(parse_year).transpose()?;

        Ok(match (month, year) {
            (None, None) => default,
            (None, Some(year)) => Self::Year(year),
            (Some(month), None) => Self::Month {
                year: today.year(),
                month,
            },
            (Some(month), Some(year)) => Self::Month { year, month },
        })
    }

    /// Year of a twelve-month trend: `year` or `today`'s year. A given
    /// `month` does not narrow the trend but must still be valid.
    pub fn trend_year(params: &PeriodParams, today: NaiveDate) -> ResultEngine<i32> {
        present(&params.month).map(parse_month).transpose()?;
        Ok(present(&params.year)
            .map(parse_year)
            .transpose()?
            .unwrap_or_else(|| today.year()))
    }

    /// Inclusive `[first, last]` day range, `None` for all time.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            Self::AllTime => None,
            Self::Year(year) => Some((
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            )),
            Self::Month { year, month } => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                Some((first, next.pred_opt()?))
            }
        }
    }

    /// Whether a budget slot `(year, month)` falls inside the period.
    pub fn contains_month(&self, year: i32, month: u32) -> bool {
        match *self {
            Self::AllTime => true,
            Self::Year(y) => y == year,
            Self::Month { year: y, month: m } => y == year && m == month,
        }
    }
}
