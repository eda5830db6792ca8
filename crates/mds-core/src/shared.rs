//! # Shared Store
//!
//! Thread-safe handle around an [`ItemStore`].
//!
//! ## Thread Safety
//! The store has no internal synchronization. `SharedItemStore` wraps it in
//! `Arc<Mutex<T>>` and holds the lock for exactly one closure, so every
//! store operation run through it is atomic with respect to other threads.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Thread A: with_store_mut(|s| s.insert(..))  ──► lock ─► insert ─► unlock│
//! │  Thread B: with_store(|s| s.find_min_price(..)) ─► waits ─► lock ─► ... │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Not RwLock?
//! Queries are short scans and half the operations mutate; a Mutex keeps it
//! simple.

use std::sync::{Arc, Mutex};

use crate::error::{CoreError, CoreResult};
use crate::store::ItemStore;

/// Cloneable, lock-protected handle to one [`ItemStore`].
#[derive(Debug, Clone, Default)]
pub struct SharedItemStore {
    store: Arc<Mutex<ItemStore>>,
}

impl SharedItemStore {
    /// Creates a handle around an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing store.
    pub fn from_store(store: ItemStore) -> Self {
        SharedItemStore {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust
    /// use mds_core::{Money, SharedItemStore};
    ///
    /// let shared = SharedItemStore::new();
    /// shared.with_store_mut(|s| s.insert(1, Money::from_cents(500), &[10])).unwrap();
    /// let price = shared.with_store(|s| s.find(1)).unwrap();
    /// assert_eq!(price, Money::from_cents(500));
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&ItemStore) -> R,
    {
        let store = self.store.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(f(&store))
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> CoreResult<R>
    where
        F: FnOnce(&mut ItemStore) -> R,
    {
        let mut store = self.store.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(f(&mut store))
    }
}
