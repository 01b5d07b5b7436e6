//! # Money Module
//!
//! Provides the `Money` type for prices, line totals and order totals.
//!
//! Amounts are whole cents in an `i64`. `0.1 + 0.2` never shows up on a
//! receipt, and a frozen `Order.total` is always the exact sum of its lines.
//!
//! ## Usage
//! ```rust
//! use driwich_core::money::Money;
//!
//! let price = Money::parse("5.00").unwrap();
//! let line = price.multiply_quantity(2);
//! assert_eq!(line + Money::from_cents(350), Money::from_cents(1350));
//! assert_eq!(Money::from_cents(1350).format_with("USD"), "$13.50");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// `+` and [`Money::multiply_quantity`] saturate at the `i64` bounds, so a
/// display figure can never panic or wrap. Anything that gets frozen into
/// an order goes through the `checked_*` methods instead.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► OrderItem.unit_price ──► line total (× quantity)
///                                                 │
///                    Cart subtotal ◄──────────────┘
///                         │
///                         ▼ commit
///                    Order.total (frozen)
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Wraps a raw cent count.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses operator input such as `"3.50"`, `"12"` or `"0.5"`.
    ///
    /// ## Rules
    /// - Digits with an optional decimal point
    /// - At most two decimal places
    /// - No sign: prices are never negative
    ///
    /// ```rust
    /// use driwich_core::money::Money;
    ///
    /// assert_eq!(Money::parse("3.5").unwrap().cents(), 350);
    /// assert!(Money::parse("3.555").is_err());
    /// assert!(Money::parse("-1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".into(),
            reason: reason.into(),
        };

        if input.is_empty() {
            return Err(ValidationError::Required { field: "price".into() });
        }

        let (major, minor) = match input.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (input, ""),
        };

        if major.is_empty() && minor.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if !major.chars().all(|c| c.is_ascii_digit()) || !minor.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a non-negative decimal number"));
        }
        if minor.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid("amount is too large"))?
        };
        // "5" → 50 cents, "05" → 5 cents
        let minor: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => minor.parse().map_err(|_| invalid("bad decimals"))?,
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whole currency units, truncated toward zero.
    #[inline]
    pub const fn whole_units(self) -> i64 {
        self.0 / 100
    }

    /// The `00..=99` fraction, sign dropped.
    #[inline]
    pub const fn fraction(self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const ZERO: Money = Money(0);

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Price of `qty` units.
    ///
    /// ```rust
    /// use driwich_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// `None` when the product does not fit in an `i64`.
    #[inline]
    pub const fn checked_multiply_quantity(self, qty: u32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats the amount for a receipt or a screen in the given currency.
    ///
    /// Known ISO codes get their symbol as a prefix; anything else is
    /// written after the amount.
    ///
    /// ```rust
    /// use driwich_core::money::Money;
    ///
    /// let total = Money::from_cents(1997);
    /// assert_eq!(total.format_with("USD"), "$19.97");
    /// assert_eq!(total.format_with("CHF"), "19.97 CHF");
    /// ```
    pub fn format_with(self, currency: &str) -> String {
        let code = currency.trim().to_ascii_uppercase();
        let symbol = match code.as_str() {
            "USD" | "CAD" | "AUD" => Some("$"),
            "EUR" => Some("€"),
            "GBP" => Some("£"),
            "" => Some(""),
            _ => None,
        };

        let sign = if self.is_negative() { "-" } else { "" };
        let amount = self.unsigned_decimal();

        match symbol {
            Some(symbol) => format!("{sign}{symbol}{amount}"),
            None => format!("{sign}{amount} {code}"),
        }
    }

    fn unsigned_decimal(self) -> String {
        format!("{}.{:02}", self.whole_units().abs(), self.fraction())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering, no currency. Use [`Money::format_with`] for
/// anything an operator or customer reads.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&self.unsigned_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_split() {
        let wrap = Money::from_cents(1099);
        assert_eq!((wrap.whole_units(), wrap.fraction()), (10, 99));

        let refund = Money::from_cents(-550);
        assert_eq!((refund.whole_units(), refund.fraction()), (-5, 50));
    }

    #[test]
    fn test_parse_accepts_operator_input() {
        assert_eq!(Money::parse("5").unwrap().cents(), 500);
        assert_eq!(Money::parse("5.00").unwrap().cents(), 500);
        assert_eq!(Money::parse("3.5").unwrap().cents(), 350);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse(" 9.99 ").unwrap().cents(), 999);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("0").unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(Money::parse(""), Err(ValidationError::Required { .. })));
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("-1.00").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_format_with_currency() {
        let amount = Money::from_cents(1350);
        assert_eq!(amount.format_with("USD"), "$13.50");
        assert_eq!(amount.format_with("usd"), "$13.50");
        assert_eq!(amount.format_with("EUR"), "€13.50");
        assert_eq!(amount.format_with("PKR"), "13.50 PKR");
        assert_eq!(Money::from_cents(-550).format_with("GBP"), "-£5.50");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let plate = Money::from_cents(800);
        let tea = Money::from_cents(150);

        assert_eq!(plate + tea, Money::from_cents(950));
        assert_eq!(tea * 4, Money::from_cents(600));

        let mut running = Money::ZERO;
        running += plate;
        assert_eq!(running, plate);

        let total: Money = [plate, tea, Money::from_cents(1)].iter().sum();
        assert_eq!(total.cents(), 951);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::from_cents(3_000_000_000);
        assert_eq!(huge.checked_multiply_quantity(u32::MAX), None);
        assert_eq!(
            huge.checked_multiply_quantity(3),
            Some(Money::from_cents(9_000_000_000))
        );

        let near_max = Money::from_cents(i64::MAX - 1);
        assert_eq!(near_max.checked_add(Money::from_cents(2)), None);
        assert_eq!(near_max.checked_add(Money::from_cents(1)), Some(Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_plain_arithmetic_saturates() {
        let huge = Money::from_cents(3_000_000_000);
        assert_eq!(huge.multiply_quantity(u32::MAX), Money::from_cents(i64::MAX));
        assert_eq!(huge * u32::MAX + huge, Money::from_cents(i64::MAX));
        assert_eq!(
            Money::from_cents(-5).multiply_quantity(u32::MAX),
            Money::from_cents(-5 * i64::from(u32::MAX))
        );
    }
}
