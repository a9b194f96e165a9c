//! # Money Module
//!
//! Provides the `Money` type and the rounding/formatting helpers every other
//! component relies on.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing 1,000 items at 0.01:                                           │
//! │    f64 → 9.999999999999831  ❌                                          │
//! │    pence → 1000 pence = £10.00  ✅                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer pence, rounded half-up once per step            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use quote_core::money::{round2, Money};
//!
//! let price = Money::from_pence(1099); // £10.99
//! let total = price + Money::from_pence(500);
//! assert_eq!(total.to_string(), "£15.99");
//!
//! // Floats only ever enter through round2, which rounds on the cent boundary
//! assert_eq!(round2(1.005), Money::from_pence(101));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Percent, Quantity};
use crate::CURRENCY_SYMBOL;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in pence (the smallest unit of the quoting currency).
///
/// ## Where Money is Used
/// ```text
/// LineItemInput.net_price ──► LineItem.unit_price ──► LineItem.line_total
///                                                            │
///       materials_total + labour_total ◄─────────────────────┘
///                │
///                ▼
///   markup ──► contingency ──► tax ──► grand_total ──► "£1285.20"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from pence.
    #[inline]
    pub const fn from_pence(pence: i64) -> Self {
        Money(pence)
    }

    /// Returns the value in pence.
    #[inline]
    pub const fn pence(&self) -> i64 {
        self.0
    }

    /// Returns the pence portion (always 0-99).
    #[inline]
    pub const fn pence_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Applies a percentage and returns the resulting amount, rounded half-up
    /// to the nearest penny.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(amount * bps + 5000) / 10000`.
    /// Negative amounts round half away from zero so `-x` mirrors `x`.
    ///
    /// ```rust
    /// use quote_core::money::Money;
    /// use quote_core::types::Percent;
    ///
    /// let subtotal = Money::from_pence(85_000);
    /// assert_eq!(subtotal.percent_of(Percent::from_whole(20)).pence(), 17_000);
    /// assert!(subtotal.percent_of(Percent::zero()).is_zero());
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        Money(div_round_half_up(self.0 as i128 * rate.bps() as i128, 10_000))
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// Quantities are held in thousandths, so the product is rounded half-up
    /// back onto the penny boundary exactly once.
    ///
    /// ```rust
    /// use quote_core::money::Money;
    /// use quote_core::types::Quantity;
    ///
    /// let per_m2 = Money::from_pence(1_299); // £12.99 per m²
    /// let area = Quantity::from_millis(2_500); // 2.5 m²
    /// assert_eq!(per_m2.times_quantity(area).pence(), 3_248); // £32.475 → £32.48
    /// ```
    pub fn times_quantity(&self, qty: Quantity) -> Money {
        Money(div_round_half_up(
            self.0 as i128 * qty.millis() as i128,
            Quantity::SCALE as i128,
        ))
    }

    /// Parses a decimal string such as `"12.5"` or `"1,299.99"` into money.
    ///
    /// Digits beyond the second decimal place are rounded half-up. A leading
    /// currency symbol is tolerated. Negative values parse as negative; the
    /// caller decides whether that is acceptable.
    pub fn parse_decimal(raw: &str) -> Result<Money, ValidationError> {
        parse_scaled(raw, 2, "amount").map(Money)
    }
}

/// Rounds a float to two decimal places, half-up on the cent boundary.
///
/// The float is first rendered to its shortest round-trip decimal string, so
/// `1.005` rounds to `1.01` even though its binary value is slightly below.
/// NaN and infinities are the caller's responsibility; they come back as zero.
///
/// ```rust
/// use quote_core::money::round2;
///
/// assert_eq!(round2(2.675).pence(), 268);
/// assert_eq!(round2(0.1 + 0.2).pence(), 30);
/// ```
pub fn round2(x: f64) -> Money {
    if !x.is_finite() {
        return Money::zero();
    }
    parse_scaled(&format!("{x}"), 2, "amount")
        .map(Money)
        .unwrap_or_default()
}

/// Formats money with the fixed currency symbol and exactly two decimals.
///
/// Same output as `Display`; exists for call sites that read better as a
/// function.
pub fn format_money(amount: Money) -> String {
    amount.to_string()
}

// =============================================================================
// Fixed-Point Helpers
// =============================================================================

/// Integer division rounding half away from zero.
pub(crate) fn div_round_half_up(numerator: i128, denominator: i128) -> i64 {
    let half = denominator / 2;
    let rounded = if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    };
    rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Parses a decimal string into an integer scaled by `10^scale`, rounding
/// extra fractional digits half-up.
///
/// Accepts an optional sign, an optional leading `£` and thousands
/// separators. Exponent notation is rejected.
pub(crate) fn parse_scaled(raw: &str, scale: u32, field: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let not_a_number = || ValidationError::NotANumber {
        field: field.to_string(),
        value: trimmed.to_string(),
    };

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let rest = rest.strip_prefix(CURRENCY_SYMBOL).unwrap_or(rest).replace(',', "");

    let (whole, frac) = match rest.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (rest.as_str(), ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(not_a_number());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(not_a_number());
    }

    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
        min: i64::MIN,
        max: i64::MAX,
    };

    let mut value: i128 = 0;
    for c in whole.chars() {
        value = value * 10 + (c as u8 - b'0') as i128;
        if value > i64::MAX as i128 {
            return Err(out_of_range());
        }
    }

    let mut digits = frac.chars();
    for _ in 0..scale {
        let digit = digits.next().map(|c| (c as u8 - b'0') as i128).unwrap_or(0);
        value = value * 10 + digit;
    }
    // Half-up on the first dropped digit
    if let Some(next) = digits.next() {
        if next >= '5' {
            value += 1;
        }
    }
    if value > i64::MAX as i128 {
        return Err(out_of_range());
    }

    let value = value as i64;
    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `£1285.20`, `-£5.50`, `£0.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{CURRENCY_SYMBOL}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds instead of wrapping or panicking.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
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
    fn test_from_pence() {
        let money = Money::from_pence(1099);
        assert_eq!(money.pence(), 1099);
        assert_eq!(money.pence_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_pence(128_520)), "£1285.20");
        assert_eq!(format!("{}", Money::from_pence(500)), "£5.00");
        assert_eq!(format!("{}", Money::from_pence(-550)), "-£5.50");
        assert_eq!(format!("{}", Money::from_pence(-5)), "-£0.05");
        assert_eq!(format_money(Money::zero()), "£0.00");
    }

    #[test]
    fn test_repeated_formatting_is_stable() {
        let amount = round2(1071.0 * 0.2);
        let first = format_money(amount);
        for _ in 0..100 {
            assert_eq!(format_money(amount), first);
        }
        assert_eq!(first, "£214.20");
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(1.005).pence(), 101);
        assert_eq!(round2(1.004).pence(), 100);
        assert_eq!(round2(2.5).pence(), 250);
        assert_eq!(round2(0.125).pence(), 13);
        assert_eq!(round2(-1.005).pence(), -101);
        assert_eq!(round2(f64::NAN), Money::zero());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("12.5").unwrap().pence(), 1250);
        assert_eq!(Money::parse_decimal("£1,299.99").unwrap().pence(), 129_999);
        assert_eq!(Money::parse_decimal(".5").unwrap().pence(), 50);
        assert_eq!(Money::parse_decimal("3.145").unwrap().pence(), 315);
        assert_eq!(Money::parse_decimal("-4").unwrap().pence(), -400);
        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal("12a").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("1e5").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pence(1000);
        let b = Money::from_pence(500);

        assert_eq!((a + b).pence(), 1500);
        assert_eq!((a - b).pence(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.pence(), 1500);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_pence(i64::MAX);
        assert_eq!(max + Money::from_pence(1), max);
        let total: Money = [max, max, max].iter().sum();
        assert_eq!(total, max);
        assert_eq!(Money::from_pence(i64::MIN) - Money::from_pence(1), Money::from_pence(i64::MIN));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(
            Money::from_pence(102_000).percent_of(Percent::from_whole(5)).pence(),
            5_100
        );
        assert_eq!(
            Money::from_pence(107_100).percent_of(Percent::from_whole(20)).pence(),
            21_420
        );
        // £10.00 at 17.5% = £1.75
        assert_eq!(
            Money::from_pence(1000).percent_of(Percent::from_bps(1750)).pence(),
            175
        );
        // £0.03 at 50% = 1.5p → 2p
        assert_eq!(
            Money::from_pence(3).percent_of(Percent::from_whole(50)).pence(),
            2
        );
    }

    #[test]
    fn test_times_quantity() {
        let unit = Money::from_pence(299);
        assert_eq!(unit.times_quantity(Quantity::from_whole(3)).pence(), 897);
        assert_eq!(unit.times_quantity(Quantity::from_millis(0)).pence(), 0);
        // 0.333 × £1.00 = 33.3p → 33p
        assert_eq!(
            Money::from_pence(100)
                .times_quantity(Quantity::from_millis(333))
                .pence(),
            33
        );
    }

    #[test]
    fn test_sum_of_many_pennies_does_not_drift() {
        let total: Money = std::iter::repeat(Money::from_pence(1)).take(1000).sum();
        assert_eq!(total, Money::from_pence(1000));
        assert_eq!(total.to_string(), "£10.00");
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_pence(-1).is_negative());
    }
}
