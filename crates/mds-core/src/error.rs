//! # Error Types
//!
//! Domain-specific error types for mds-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mds-core errors (this file)                                           │
//! │  ├── CoreError        - Parse failures, index inconsistencies          │
//! │  └── ValidationError  - Argument rule violations                       │
//! │                                                                         │
//! │  mds-driver errors (separate crate)                                    │
//! │  └── DriverError      - Config, I/O, command syntax                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DriverError → exit status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! A missing id or tag is never an error. Queries answer with zero Money
//! or a zero count instead.

use thiserror::Error;

use crate::types::{ItemId, Tag};

// =============================================================================
// Core Error
// =============================================================================

/// Core errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A price string is not in `D`, `D.C` or `D.CC` form.
    #[error("Invalid money format '{input}': {reason}")]
    InvalidMoneyFormat { input: String, reason: String },

    /// A hike rate string is not a decimal percentage.
    #[error("Invalid rate format '{input}': {reason}")]
    InvalidRateFormat { input: String, reason: String },

    /// The primary table and the inverted index disagree.
    ///
    /// ## When This Occurs
    /// Never, unless a mutation skipped half of its update. Raised by
    /// [`ItemStore::verify_consistency`](crate::store::ItemStore::verify_consistency).
    #[error("Index inconsistent for item {id}, tag {tag}: {detail}")]
    IndexInconsistent { id: ItemId, tag: Tag, detail: String },

    /// An inverted index entry exists with no ids in it.
    #[error("Index entry for tag {tag} is empty")]
    EmptyIndexEntry { tag: Tag },

    /// A thread panicked while holding the shared store lock.
    #[error("Item store lock poisoned")]
    LockPoisoned,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Argument validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
