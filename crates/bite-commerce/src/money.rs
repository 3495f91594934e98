//! Rupee amounts.
//!
//! Uses a minor-unit integer representation (paise) to avoid the
//! floating-point drift that plagues cart totals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Paise per rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Symbol used when formatting amounts.
pub const RUPEE_SYMBOL: &str = "\u{20b9}";

/// An amount of Indian rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in paise.
    pub amount_minor: i64,
}

impl Money {
    /// Create a new Money value from paise.
    pub fn new(amount_minor: i64) -> Self {
        Self { amount_minor }
    }

    /// Create a Money value from a rupee amount, rounded to the paisa.
    ///
    /// Non-finite input becomes zero.
    ///
    /// ```
    /// use bite_commerce::money::Money;
    /// let price = Money::from_decimal(249.5);
    /// assert_eq!(price.amount_minor, 24950);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self::new((amount * PAISE_PER_RUPEE as f64).round() as i64)
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Convert to rupees.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / PAISE_PER_RUPEE as f64
    }

    /// Format with the rupee symbol (e.g., "₹249.50").
    pub fn display(&self) -> String {
        format!("{}{}", RUPEE_SYMBOL, self.display_amount())
    }

    /// Format without symbol (e.g., "249.50").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.to_decimal())
    }

    /// Add another amount, returning None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_minor
            .checked_add(other.amount_minor)
            .map(Money::new)
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_minor.checked_mul(factor).map(Money::new)
    }

    /// Calculate a percentage of this amount, rounded to the paisa.
    pub fn percentage(&self, percent: f64) -> Money {
        Money::new((self.amount_minor as f64 * percent / 100.0).round() as i64)
    }

    /// Sum amounts, returning None on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serde adapter writing a price as a plain rupee number, the shape the
/// persisted cart uses (`"price": 249.5`).
pub mod decimal {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount))
    }
}
