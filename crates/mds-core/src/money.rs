//! # Money Module
//!
//! Provides the `Money` type for exact monetary values.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Hike $10.00 by 10% ten times with f64:                                │
//! │    10.0 * 1.1 * 1.1 ...  → 25.937424601000018  ❌ residue              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1000 → 1100 → 1210 → 1331 → ...                                     │
//! │    Fractional pennies are discarded at every step, explicitly          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mds_core::money::Money;
//!
//! // Parse the "dollars.cents" text form
//! let price: Money = "19.97".parse().unwrap();
//! assert_eq!(price.cents(), 1997);
//!
//! // A single cent digit denotes tens
//! let price: Money = "5.3".parse().unwrap();
//! assert_eq!(price.cents(), 530);
//!
//! // Arithmetic stays in cents
//! let total = price + Money::from_cents(70);
//! assert_eq!(total.to_string(), "6.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::HikeRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: net price changes from a negative hike are negative
/// - **Single field tuple struct**: ordering by total cents is exactly the
///   "dollars first, then cents" order
/// - **Serde**: serializes as the bare integer cent count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.dollars(), 10);
    /// assert_eq!(price.cents_part(), 99);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// Cents outside `0..=99` carry into dollars, so the result is always
    /// normalized. The sign follows the dollar part.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(1, 150).to_string(), "2.50");
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the total value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion, truncated toward zero.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    ///
    /// This is also the "nothing found" answer of every price query.
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

    /// Computes the change a percentage hike makes to this amount.
    ///
    /// Fractional pennies are discarded by truncating toward zero, so a
    /// negative rate mirrors a positive one: `+49%` and `-49%` of one cent
    /// are both zero.
    ///
    /// ## Implementation
    /// Integer math only: `cents * rate_units / (100 * UNITS_PER_PERCENT)`
    /// in i128. A change that does not fit in i64 saturates.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::money::Money;
    /// use mds_core::types::HikeRate;
    ///
    /// let price = Money::from_cents(1000);
    /// let rate: HikeRate = "7.5".parse().unwrap();
    /// assert_eq!(price.hike_delta(rate).cents(), 75);
    ///
    /// let penny = Money::from_cents(1);
    /// assert!(penny.hike_delta("49".parse().unwrap()).is_zero());
    /// ```
    pub fn hike_delta(&self, rate: HikeRate) -> Money {
        let scaled = self.0 as i128 * rate.units() as i128;
        let delta = scaled / (100 * HikeRate::UNITS_PER_PERCENT as i128);
        Money(saturate_i64(delta))
    }

    /// Returns this amount after a percentage hike.
    #[inline]
    pub fn hiked(&self, rate: HikeRate) -> Money {
        Money(self.0.saturating_add(self.hike_delta(rate).0))
    }
}

/// Narrows an i128 cent count into i64, saturating at the bounds.
pub(crate) fn saturate_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the `"D"`, `"D.C"` or `"D.CC"` text form.
///
/// ## Rules
/// ```text
/// "19.97"  → 1997 cents
/// "5.3"    → 530 cents   (one cent digit means tens)
/// "5.03"   → 503 cents
/// "7"      → 700 cents
/// "-0.50"  → -50 cents
/// "5."     → error (missing cent digits)
/// "5.123"  → error (more than two cent digits)
/// "1.2.3"  → error
/// ```
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| CoreError::InvalidMoneyFormat {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (negative, body) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (dollar_text, cent_text) = match body.split_once('.') {
            Some((d, c)) => (d, Some(c)),
            None => (body, None),
        };

        if dollar_text.is_empty() {
            return Err(invalid("missing dollar digits"));
        }
        if !dollar_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("dollars must be decimal digits"));
        }
        let dollars: i64 = dollar_text
            .parse()
            .map_err(|_| invalid("dollar amount out of range"))?;

        let cents: i64 = match cent_text {
            None => 0,
            Some(c) if c.is_empty() => return Err(invalid("missing cent digits")),
            Some(c) if !c.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid("cents must be decimal digits"))
            }
            Some(c) if c.len() == 1 => i64::from(c.as_bytes()[0] - b'0') * 10,
            Some(c) if c.len() == 2 => {
                i64::from(c.as_bytes()[0] - b'0') * 10 + i64::from(c.as_bytes()[1] - b'0')
            }
            Some(_) => return Err(invalid("at most two cent digits")),
        };

        // Negatives are built downward so i64::MIN is reachable.
        let total = if negative {
            dollars
                .checked_mul(-100)
                .and_then(|d| d.checked_sub(cents))
        } else {
            dollars
                .checked_mul(100)
                .and_then(|d| d.checked_add(cents))
        }
        .ok_or_else(|| invalid("dollar amount out of range"))?;

        Ok(Money(total))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `D.CC`, with a leading `-` for negative values.
///
/// The output parses back to the same value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor_carries() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(1, 150).cents(), 250);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_parse_two_cent_digits() {
        assert_eq!(money("19.97").cents(), 1997);
        assert_eq!(money("5.03").cents(), 503);
        assert_eq!(money("0.01").cents(), 1);
    }

    #[test]
    fn test_parse_single_cent_digit_means_tens() {
        assert_eq!(money("5.3").cents(), 530);
        assert_eq!(money("0.5").cents(), 50);
    }

    #[test]
    fn test_parse_whole_dollars_and_sign() {
        assert_eq!(money("7").cents(), 700);
        assert_eq!(money(" 12 ").cents(), 1200);
        assert_eq!(money("-0.50").cents(), -50);
        assert_eq!(money("-3").cents(), -300);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "-", ".5", "5.", "5.123", "1.2.3", "abc", "5.x", "+5", "1e3", "5 .00"] {
            let err = bad.parse::<Money>().unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidMoneyFormat { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!("92233720368547758.08".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(503).to_string(), "5.03");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_display_parses_back() {
        for cents in [0, 1, 9, 10, 99, 100, 530, 1997, -1, -50, -12345] {
            let m = Money::from_cents(cents);
            assert_eq!(money(&m.to_string()), m);
        }
    }

    #[test]
    fn test_ordering_dollars_then_cents() {
        assert!(money("2.99") < money("3.00"));
        assert!(money("3.01") > money("3.00"));
        assert!(money("-1.00") < Money::zero());
        assert_eq!(money("2.5"), money("2.50"));
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
    }

    #[test]
    fn test_hike_delta_truncates_fractional_pennies() {
        // 10.00 at 10% is exactly 1.00
        assert_eq!(Money::from_cents(1000).hike_delta(HikeRate::from_percent(10)).cents(), 100);
        // 0.01 at 49% is 0.0049 of a penny
        assert!(Money::from_cents(1).hike_delta(HikeRate::from_percent(49)).is_zero());
        // 0.99 at 7.5% = 7.425 cents → 7
        assert_eq!(Money::from_cents(99).hike_delta("7.5".parse().unwrap()).cents(), 7);
    }

    #[test]
    fn test_hike_delta_negative_rate_is_symmetric() {
        let rate: HikeRate = "-7.5".parse().unwrap();
        assert_eq!(Money::from_cents(1000).hike_delta(rate).cents(), -75);
        assert_eq!(Money::from_cents(99).hike_delta(rate).cents(), -7);
        assert!(Money::from_cents(1).hike_delta(HikeRate::from_percent(-49)).is_zero());
    }

    #[test]
    fn test_repeated_hikes_have_no_residue() {
        let mut price = Money::from_cents(1000);
        let rate = HikeRate::from_percent(10);
        for _ in 0..10 {
            price = price.hiked(rate);
        }
        // 1000 → 1100 → 1210 → 1331 → 1464 → 1610 → 1771 → 1948 → 2142 → 2356 → 2591
        assert_eq!(price.cents(), 2591);
    }

    #[test]
    fn test_hike_saturates() {
        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!(huge.hiked(HikeRate::from_percent(50)).cents(), i64::MAX);
    }

    #[test]
    fn test_extreme_values_round_trip() {
        for cents in [i64::MIN, i64::MIN + 1, i64::MAX] {
            let money = Money::from_cents(cents);
            assert_eq!(money.to_string().parse::<Money>().unwrap(), money);
        }
        assert_eq!(Money::from_cents(i64::MIN).to_string(), "-92233720368547758.08");
        assert!("-92233720368547758.09".parse::<Money>().is_err());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1997)).unwrap();
        assert_eq!(json, "1997");
        let back: Money = serde_json::from_str("-50").unwrap();
        assert_eq!(back, Money::from_cents(-50));
    }
}
