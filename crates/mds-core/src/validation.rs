//! # Validation Module
//!
//! Argument checks for callers that accept untrusted input.
//!
//! The store operations themselves are total: any id, tag or price is
//! accepted. These validators sit at the boundary (text parsing, the
//! driver) and reject values that would only ever come from bad input.
//!
//! ## Usage
//! ```rust
//! use mds_core::money::Money;
//! use mds_core::validation::{validate_price, validate_tags};
//!
//! validate_price(Money::from_cents(1997)).unwrap();
//! validate_tags(&[475, 1238, 9742]).unwrap();
//! assert!(validate_price(Money::from_cents(-1)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{HikeRate, Tag};
use crate::MAX_DESCRIPTION_TAGS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates an item price.
///
/// ## Rules
/// - Must be non-negative
/// - Zero is allowed
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a hike rate.
///
/// ## Rules
/// - Must not be below -100%: a larger cut would drive prices negative
pub fn validate_hike_rate(rate: HikeRate) -> ValidationResult<()> {
    if rate < HikeRate::from_percent(-100) {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: -100,
            max: i64::MAX / HikeRate::UNITS_PER_PERCENT,
        });
    }

    Ok(())
}

/// Validates a description tag list.
///
/// ## Rules
/// - At most [`MAX_DESCRIPTION_TAGS`] entries
/// - Tag 0 is reserved as the list terminator of the command format
pub fn validate_tags(tags: &[Tag]) -> ValidationResult<()> {
    if tags.len() > MAX_DESCRIPTION_TAGS {
        return Err(ValidationError::OutOfRange {
            field: "description length".to_string(),
            min: 0,
            max: MAX_DESCRIPTION_TAGS as i64,
        });
    }

    if tags.contains(&0) {
        return Err(ValidationError::InvalidFormat {
            field: "description".to_string(),
            reason: "tag 0 is reserved".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
