//! # mds-core: Indexed Item Store
//!
//! This crate is the **heart** of MDS. It holds items (id, price,
//! description tags) and answers price questions about tags, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          MDS Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  mds-driver (apps/driver)                       │   │
//! │  │    reads command lines ──► parses args ──► checksum / report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ eight operations                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mds-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │   money   │  │   types   │  │ validation│  │   │
//! │  │   │ ItemStore │  │   Money   │  │   Item    │  │   rules   │  │   │
//! │  │   │  index    │  │  parsing  │  │ HikeRate  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO PRINTING • INTEGER MONEY                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `ItemStore`: primary table + inverted index
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - `Item`, `InsertOutcome`, `HikeRate`
//! - [`shared`] - `SharedItemStore` for multi-threaded callers
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation
//!
//! ## Example Usage
//!
//! ```rust
//! use mds_core::{ItemStore, Money};
//!
//! let mut store = ItemStore::new();
//! store.insert(1, "5.00".parse().unwrap(), &[10, 20]);
//! store.insert(2, "3.00".parse().unwrap(), &[20, 30]);
//!
//! assert_eq!(store.find_min_price(20), Money::from_cents(300));
//! assert_eq!(store.find_max_price(20), Money::from_cents(500));
//! assert_eq!(store.remove_names(1, &[10, 99]), 10);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod shared;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use shared::SharedItemStore;
pub use store::ItemStore;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of tags accepted in one description at the input boundary.
pub const MAX_DESCRIPTION_TAGS: usize = 1024;
