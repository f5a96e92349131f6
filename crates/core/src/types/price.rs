//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are non-negative amounts in the store currency (Indian rupees),
//! kept as [`Decimal`] so that line totals never accumulate float error.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency symbol used when formatting prices.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in the store currency.
///
/// Serialized as a decimal string (`"999.50"`); numeric JSON values are
/// accepted when deserializing.
///
/// ```
/// use rust_decimal::Decimal;
/// use shopfront_core::Price;
///
/// let price = Price::new(Decimal::new(99_900, 2)).unwrap();
/// assert_eq!((price * 2).display(), "₹1,998.00");
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_whole(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with two decimals and Indian digit grouping
    /// (e.g. `₹1,23,456.00`).
    #[must_use]
    pub fn display(&self) -> String {
        let formatted = format!("{:.2}", self.0.round_dp(2));
        let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));
        format!("{CURRENCY_SYMBOL}{}.{fraction}", group_indian(whole))
    }
}

/// Insert separators as `12,34,567`: the last three digits form one group,
/// everything before it is grouped in pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_amounts() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_groups_indian_style() {
        assert_eq!(Price::from_whole(0).display(), "₹0.00");
        assert_eq!(Price::from_whole(999).display(), "₹999.00");
        assert_eq!(Price::from_whole(4000).display(), "₹4,000.00");
        assert_eq!(Price::from_whole(123_456).display(), "₹1,23,456.00");
        assert_eq!(Price::from_whole(12_345_678).display(), "₹1,23,45,678.00");
        assert_eq!(
            Price::new(Decimal::new(199_95, 2)).unwrap().display(),
            "₹199.95"
        );
    }

    #[test]
    fn test_multiplication_and_sum() {
        let line = Price::from_whole(999) * 2;
        assert_eq!(line, Price::from_whole(1998));

        let total: Price = [Price::from_whole(1), Price::from_whole(2)].into_iter().sum();
        assert_eq!(total, Price::from_whole(3));
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("999").unwrap();
        let from_string: Price = serde_json::from_str("\"999\"").unwrap();
        assert_eq!(from_number, from_string);

        assert!(serde_json::from_str::<Price>("-5").is_err());
    }
}
