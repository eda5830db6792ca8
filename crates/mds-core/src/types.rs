//! # Domain Types
//!
//! Core domain types used by the item store.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │  InsertOutcome  │   │    HikeRate     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  price (Money)  │   │  Inserted  (1)  │   │  units (i64)    │       │
//! │  │  tags (BTreeSet)│   │  Updated   (0)  │   │  75000 = 7.5%   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ItemId = i64          Tag = i64                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Money;
use crate::validation::validate_hike_rate;

/// Unique identifier of an item.
pub type ItemId = i64;

/// One integer of an item's description. Tags are the inverted index keys.
pub type Tag = i64;

// =============================================================================
// Item
// =============================================================================

/// A stored item: its current price and description.
///
/// The id is the key of the primary table and is not repeated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Current price.
    pub price: Money,

    /// Description tags, deduplicated and ordered.
    pub tags: BTreeSet<Tag>,
}

impl Item {
    /// Creates an item, collapsing duplicate tags.
    pub fn new(price: Money, tags: &[Tag]) -> Self {
        Item {
            price,
            tags: tags.iter().copied().collect(),
        }
    }

    /// Sum of the description's tag values, wrapping on overflow.
    pub fn tag_sum(&self) -> i64 {
        wrapping_tag_sum(&self.tags)
    }

    /// Checks whether the description contains a tag.
    #[inline]
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Adds tag values with two's-complement wrap-around.
///
/// Tags are arbitrary i64 values, so their sum may not fit.
pub fn wrapping_tag_sum<'a, I>(tags: I) -> i64
where
    I: IntoIterator<Item = &'a Tag>,
{
    tags.into_iter().fold(0i64, |acc, &tag| acc.wrapping_add(tag))
}

// =============================================================================
// Insert Outcome
// =============================================================================

/// Result of [`ItemStore::insert`](crate::store::ItemStore::insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertOutcome {
    /// The id was not present; a new record was created.
    Inserted,
    /// The id already existed; its price (and maybe description) changed.
    Updated,
}

impl InsertOutcome {
    /// Returns true when a new record was created.
    #[inline]
    pub const fn is_new(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }

    /// Returns the numeric form: 1 for new, 0 otherwise.
    #[inline]
    pub const fn flag(&self) -> i64 {
        match self {
            InsertOutcome::Inserted => 1,
            InsertOutcome::Updated => 0,
        }
    }
}

// =============================================================================
// Hike Rate
// =============================================================================

/// A signed percentage used by price hikes.
///
/// ## Why Fixed Point?
/// Rates arrive as decimals ("7.5"), but price arithmetic must stay in
/// integer cents. The rate is held as ten-thousandths of a percent:
///
/// ```text
/// "10"     → 100_000 units
/// "7.5"    →  75_000 units
/// "0.0125" →     125 units
/// "-20"    → -200_000 units
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HikeRate(i64);

impl HikeRate {
    /// Fixed-point units in one percent.
    pub const UNITS_PER_PERCENT: i64 = 10_000;

    /// Maximum number of decimal places accepted when parsing.
    pub const MAX_DECIMALS: usize = 4;

    /// Creates a rate from raw fixed-point units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        HikeRate(units)
    }

    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_percent(pct: i64) -> Self {
        HikeRate(pct * Self::UNITS_PER_PERCENT)
    }

    /// Creates a rate from basis points (1 bp = 0.01%).
    #[inline]
    pub const fn from_basis_points(bps: i64) -> Self {
        HikeRate(bps * (Self::UNITS_PER_PERCENT / 100))
    }

    /// Returns the raw fixed-point units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        HikeRate(0)
    }
}

impl Default for HikeRate {
    fn default() -> Self {
        HikeRate::zero()
    }
}

/// Parses a decimal percentage such as `"7.5"`, `"-10"` or `"+0.25"`.
///
/// ## Rules
/// - Optional sign, at least one integer digit, optional fraction
/// - At most [`HikeRate::MAX_DECIMALS`] fraction digits
/// - Rates below -100% are rejected
impl FromStr for HikeRate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: &str| CoreError::InvalidRateFormat {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (negative, body) = if let Some(rest) = input.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = input.strip_prefix('+') {
            (false, rest)
        } else {
            (false, input)
        };

        let (whole_text, frac_text) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        if whole_text.is_empty() || !whole_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected decimal digits before the point"));
        }
        if !frac_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected decimal digits after the point"));
        }
        if frac_text.len() > Self::MAX_DECIMALS {
            return Err(invalid("at most four decimal places"));
        }

        let whole: i64 = whole_text
            .parse()
            .map_err(|_| invalid("rate out of range"))?;
        let mut frac: i64 = 0;
        for (i, digit) in frac_text.bytes().enumerate() {
            let place = 10_i64.pow((Self::MAX_DECIMALS - 1 - i) as u32);
            frac += i64::from(digit - b'0') * place;
        }

        let units = whole
            .checked_mul(Self::UNITS_PER_PERCENT)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| invalid("rate out of range"))?;

        let rate = HikeRate(if negative { -units } else { units });
        validate_hike_rate(rate)?;
        Ok(rate)
    }
}

impl fmt::Display for HikeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per = Self::UNITS_PER_PERCENT as u64;
        let frac = magnitude % per;
        if frac == 0 {
            write!(f, "{}{}%", sign, magnitude / per)
        } else {
            let digits = format!("{:04}", frac);
            write!(f, "{}{}.{}%", sign, magnitude / per, digits.trim_end_matches('0'))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_collapses_duplicate_tags() {
        let item = Item::new(Money::from_cents(500), &[20, 10, 20, 10]);
        assert_eq!(item.tags.len(), 2);
        assert_eq!(item.tag_sum(), 30);
        assert!(item.has_tag(10));
        assert!(!item.has_tag(30));
    }

    #[test]
    fn test_insert_outcome_flag() {
        assert_eq!(InsertOutcome::Inserted.flag(), 1);
        assert_eq!(InsertOutcome::Updated.flag(), 0);
        assert!(InsertOutcome::Inserted.is_new());
        assert!(!InsertOutcome::Updated.is_new());
    }

    #[test]
    fn test_rate_parsing() {
        assert_eq!("10".parse::<HikeRate>().unwrap().units(), 100_000);
        assert_eq!("7.5".parse::<HikeRate>().unwrap().units(), 75_000);
        assert_eq!("0.0125".parse::<HikeRate>().unwrap().units(), 125);
        assert_eq!("+3".parse::<HikeRate>().unwrap(), HikeRate::from_percent(3));
        assert_eq!("-20".parse::<HikeRate>().unwrap().units(), -200_000);
        assert_eq!("5.".parse::<HikeRate>().unwrap(), HikeRate::from_percent(5));
    }

    #[test]
    fn test_rate_parsing_rejects_malformed() {
        for bad in ["", "-", ".5", "abc", "1.2.3", "7.12345", "1e2", "5%"] {
            assert!(
                matches!(bad.parse::<HikeRate>(), Err(CoreError::InvalidRateFormat { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rate_below_minus_hundred_is_rejected() {
        assert!("-100".parse::<HikeRate>().is_ok());
        assert!(matches!(
            "-100.5".parse::<HikeRate>(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_rate_constructors_agree() {
        assert_eq!(HikeRate::from_percent(8), HikeRate::from_basis_points(800));
        assert_eq!(HikeRate::from_units(82_500), HikeRate::from_basis_points(825));
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(HikeRate::from_percent(10).to_string(), "10%");
        assert_eq!(HikeRate::from_units(75_000).to_string(), "7.5%");
        assert_eq!(HikeRate::from_units(-125).to_string(), "-0.0125%");
    }
}
