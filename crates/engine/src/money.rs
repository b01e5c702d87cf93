use std::fmt;

use rust_decimal::Decimal;

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer cents**.
///
/// Every amount stored or aggregated by the engine goes through this type so
/// sums stay exact. Arithmetic is checked: an overflow is reported as
/// [`EngineError::InvalidAmount`] instead of wrapping.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }

    /// Addition that reports overflow as an engine error.
    pub fn try_add(self, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
        self.checked_add(rhs).ok_or_else(overflow)
    }

    /// Subtraction that reports overflow as an engine error.
    pub fn try_sub(self, rhs: MoneyCents) -> ResultEngine<MoneyCents> {
        self.checked_sub(rhs).ok_or_else(overflow)
    }

    /// Sums an iterator of amounts, failing on overflow.
    pub fn try_sum<I>(items: I) -> ResultEngine<MoneyCents>
    where
        I: IntoIterator<Item = MoneyCents>,
    {
        items
            .into_iter()
            .try_fold(MoneyCents::ZERO, MoneyCents::try_add)
    }

    /// Exact decimal view with two fractional digits (`1050` -> `10.50`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

fn overflow() -> EngineError {
    EngineError::InvalidAmount("amount out of range".to_string())
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl TryFrom<Decimal> for MoneyCents {
    type Error = EngineError;

    /// Converts an exact decimal amount, rejecting more than 2 fractional
    /// digits (after trailing zeros are dropped).
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let normalized = value.normalize();
        if normalized.scale() > 2 {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }
        let cents = normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(overflow)?;
        i64::try_from(cents).map(MoneyCents).map_err(|_| overflow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn decimal_conversion_is_exact() {
        let cents = MoneyCents::try_from(Decimal::new(100050, 2)).unwrap();
        assert_eq!(cents.cents(), 100050);
        assert_eq!(i64::from(cents), 100050);
        assert_eq!(cents.to_decimal().to_string(), "1000.50");

        // trailing zeros beyond two digits are fine, real fractions are not
        assert_eq!(
            MoneyCents::try_from(Decimal::new(12500, 3)).unwrap().cents(),
            1250
        );
        assert!(MoneyCents::try_from(Decimal::new(12345, 3)).is_err());
    }

    #[test]
    fn sums_report_overflow() {
        let total = MoneyCents::try_sum([MoneyCents::new(100_050), MoneyCents::new(25_025)]);
        assert_eq!(total.unwrap(), MoneyCents::new(125_075));

        let overflow = MoneyCents::try_sum([MoneyCents::new(i64::MAX), MoneyCents::new(1)]);
        assert!(matches!(overflow, Err(EngineError::InvalidAmount(_))));
    }
}
