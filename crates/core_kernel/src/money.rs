//! Money as integer minor units (paise)
//!
//! All monetary arithmetic in the system happens on `i64` paise to avoid
//! floating-point rounding error. Decimal values exist only at I/O
//! boundaries (database NUMERIC columns, display, user input) and are
//! converted through this module.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during money conversion
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A monetary amount in integer paise (hundredths of a rupee)
///
/// The representation is a plain `i64`, so addition and subtraction are
/// exact. Negative values are representable (balance adjustments can dip
/// below zero transiently) but the billing engine clamps customer-facing
/// balances at zero.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Returns the value in paise
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Zero paise
    pub const fn zero() -> Self {
        Money(0)
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Converts a decimal rupee amount to paise, strictly
    ///
    /// Rounds half away from zero to two decimal places. Amounts whose
    /// paise value does not fit in `i64` are an error.
    pub fn from_decimal(amount: Decimal) -> Result<Self, MoneyError> {
        let paise = amount
            .checked_mul(dec!(100))
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        paise.to_i64().map(Money).ok_or(MoneyError::Overflow)
    }

    /// Converts a decimal rupee amount to paise, zeroing on failure
    ///
    /// Garbage-in-zero-out: anything that cannot be represented becomes 0
    /// paise. Use [`Money::from_decimal`] where silent zeroing would mask a
    /// caller error.
    pub fn from_decimal_lossy(amount: Decimal) -> Self {
        Self::from_decimal(amount).unwrap_or_default()
    }

    /// Parses a decimal string into paise, strictly
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` for empty or unparseable input,
    /// `MoneyError::Overflow` for amounts outside the `i64` paise range.
    pub fn parse_strict(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyError::InvalidAmount("empty amount".to_string()));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| MoneyError::InvalidAmount(trimmed.to_string()))?;
        Self::from_decimal(amount)
    }

    /// Parses a decimal string into paise, zeroing on failure
    ///
    /// `NaN`, empty and unparseable strings all convert to 0 paise. Meant
    /// for display and import paths; validating boundaries should prefer
    /// [`Money::parse_strict`].
    pub fn parse_lossy(input: &str) -> Self {
        Self::parse_strict(input).unwrap_or_default()
    }

    /// Converts paise back to a decimal rupee amount
    ///
    /// Exact: divides by 100 with no further rounding, since the numerator
    /// is already an integer.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Checked addition
    pub fn checked_add(&self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: Money) -> Result<Money, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(MoneyError::Overflow)
    }

    /// Addition that pins at the representable extremes instead of wrapping
    pub fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtraction that pins at the representable extremes instead of wrapping
    pub fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Clamps the value to at least zero
    ///
    /// Customer balances never go negative; overpayment is tracked as a
    /// separate advance amount.
    pub fn clamp_non_negative(&self) -> Money {
        if self.0 < 0 {
            Money::zero()
        } else {
            *self
        }
    }
}

/// Displays the amount in rupees with two decimal places, e.g. `1570.00`
///
/// Locale symbols are a presentation concern of the callers.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let m = Money::from_paise(157000);
        assert_eq!(m.paise(), 157000);
        assert_eq!(m.to_decimal(), dec!(1570.00));
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(10.005)).unwrap().paise(), 1001);
        assert_eq!(Money::from_decimal(dec!(10.004)).unwrap().paise(), 1000);
        assert_eq!(Money::from_decimal(dec!(-10.005)).unwrap().paise(), -1001);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(Money::parse_strict("1500").unwrap().paise(), 150000);
        assert_eq!(Money::parse_strict(" 12.34 ").unwrap().paise(), 1234);
        assert!(matches!(
            Money::parse_strict(""),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(matches!(
            Money::parse_strict("abc"),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_lossy_zeroes_junk() {
        assert_eq!(Money::parse_lossy("NaN"), Money::zero());
        assert_eq!(Money::parse_lossy(""), Money::zero());
        assert_eq!(Money::parse_lossy("not a number"), Money::zero());
        assert_eq!(Money::parse_lossy("42.50").paise(), 4250);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(250);

        assert_eq!((a + b).paise(), 1250);
        assert_eq!((a - b).paise(), 750);
        assert_eq!((-a).paise(), -1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].iter().map(|p| Money::from_paise(*p)).sum();
        assert_eq!(total.paise(), 600);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_paise(-500).clamp_non_negative(), Money::zero());
        assert_eq!(
            Money::from_paise(500).clamp_non_negative(),
            Money::from_paise(500)
        );
    }

    #[test]
    fn test_checked_overflow() {
        let max = Money::from_paise(i64::MAX);
        assert_eq!(
            max.checked_add(Money::from_paise(1)),
            Err(MoneyError::Overflow)
        );
        assert_eq!(max.saturating_add(Money::from_paise(1)), max);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(157000).to_string(), "1570.00");
        assert_eq!(Money::from_paise(5).to_string(), "0.05");
        assert_eq!(Money::from_paise(-550).to_string(), "-5.50");
    }
}
