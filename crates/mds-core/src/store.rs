//! # Item Store
//!
//! The primary table and its inverted index, kept as mirror images.
//!
//! ## Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ItemStore                                     │
//! │                                                                         │
//! │  Primary Table (BTreeMap, id order)     Inverted Index (HashMap)        │
//! │  ──────────────────────────────────     ─────────────────────────       │
//! │  1 → { 5.00, {10, 20} }                 10 → {1}                        │
//! │  2 → { 3.00, {20, 30} }                 20 → {1, 2}                     │
//! │  4 → { 0.99, {} }                       30 → {2}                        │
//! │                                                                         │
//! │  INVARIANT: tag ∈ items[id].tags  ⇔  id ∈ index[tag]                   │
//! │             no index entry is ever an empty set                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Map
//! ```text
//! insert ──────────► items + index   (create, replace, or price-only)
//! delete ──────────► items + index
//! remove_names ────► items + index
//! price_hike ──────► items only      (range scan over ids)
//! find ────────────► items
//! find_min/max ────► index → items   (scan the tag's ids)
//! find_price_range ► index → items
//! ```
//!
//! Every mutation finishes both halves before returning. In debug builds the
//! touched entries are re-checked after each mutation.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::error::{CoreError, CoreResult};
use crate::money::{saturate_i64, Money};
use crate::types::{wrapping_tag_sum, HikeRate, InsertOutcome, Item, ItemId, Tag};

/// In-memory store of items with a tag → ids inverted index.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    /// Primary table, ordered by id for range scans.
    items: BTreeMap<ItemId, Item>,

    /// Inverted index: tag → ids of items whose description has the tag.
    index: HashMap<Tag, BTreeSet<ItemId>>,
}

impl ItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts a new item or updates an existing one.
    ///
    /// ## Behavior
    /// ```text
    /// id absent                 → create with price + tags      → Inserted
    /// id present, tags empty    → change price only             → Updated
    /// id present, tags given    → replace price + description   → Updated
    /// ```
    ///
    /// Duplicate tags collapse. A new item may have no tags at all.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::{ItemStore, InsertOutcome, Money};
    ///
    /// let mut store = ItemStore::new();
    /// let outcome = store.insert(22, Money::from_cents(1997), &[475, 1238]);
    /// assert_eq!(outcome, InsertOutcome::Inserted);
    ///
    /// // Empty description: price update only, tags untouched
    /// let outcome = store.insert(22, Money::from_cents(2500), &[]);
    /// assert_eq!(outcome, InsertOutcome::Updated);
    /// assert_eq!(store.find_max_price(475), Money::from_cents(2500));
    /// ```
    pub fn insert(&mut self, id: ItemId, price: Money, tags: &[Tag]) -> InsertOutcome {
        if !self.items.contains_key(&id) {
            self.create(id, price, tags);
            InsertOutcome::Inserted
        } else if tags.is_empty() {
            if let Some(item) = self.items.get_mut(&id) {
                item.price = price;
            }
            debug!(id, %price, "item price updated");
            InsertOutcome::Updated
        } else {
            self.replace(id, price, tags);
            InsertOutcome::Updated
        }
    }

    /// Creates a record for an absent id and links its tags.
    fn create(&mut self, id: ItemId, price: Money, tags: &[Tag]) {
        let item = Item::new(price, tags);
        let touched: Vec<Tag> = item.tags.iter().copied().collect();
        for &tag in &touched {
            self.link(tag, id);
        }
        self.items.insert(id, item);

        debug!(id, %price, tags = touched.len(), "item inserted");
        self.debug_assert_mirrored(id, &touched);
    }

    /// Replaces price and description of an existing id in place.
    ///
    /// Only the difference between the old and new descriptions touches the
    /// index; tags present in both keep their membership. The record itself
    /// is never removed, so no caller can observe the id as missing.
    fn replace(&mut self, id: ItemId, price: Money, tags: &[Tag]) {
        let new_tags: BTreeSet<Tag> = tags.iter().copied().collect();

        let Some(item) = self.items.get_mut(&id) else {
            return;
        };
        let dropped: Vec<Tag> = item.tags.difference(&new_tags).copied().collect();
        let added: Vec<Tag> = new_tags.difference(&item.tags).copied().collect();
        item.price = price;
        item.tags = new_tags;

        for &tag in &dropped {
            self.unlink(tag, id);
        }
        for &tag in &added {
            self.link(tag, id);
        }

        debug!(
            id,
            %price,
            dropped = dropped.len(),
            added = added.len(),
            "item replaced"
        );
        if cfg!(debug_assertions) {
            let touched: Vec<Tag> = dropped.into_iter().chain(added).collect();
            self.debug_assert_mirrored(id, &touched);
        }
    }

    /// Deletes an item and returns the sum of its description's tags.
    ///
    /// Returns 0 when the id is absent. The sum wraps on i64 overflow.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::{ItemStore, Money};
    ///
    /// let mut store = ItemStore::new();
    /// store.insert(1, Money::from_cents(500), &[10, 20]);
    /// assert_eq!(store.delete(1), 30);
    /// assert_eq!(store.delete(1), 0);
    /// assert!(store.find(1).is_zero());
    /// ```
    pub fn delete(&mut self, id: ItemId) -> i64 {
        let Some(item) = self.items.remove(&id) else {
            trace!(id, "delete of absent item");
            return 0;
        };

        for &tag in &item.tags {
            self.unlink(tag, id);
        }

        let sum = item.tag_sum();
        debug!(id, tags = item.tags.len(), sum, "item deleted");
        if cfg!(debug_assertions) {
            let touched: Vec<Tag> = item.tags.iter().copied().collect();
            self.debug_assert_mirrored(id, &touched);
        }
        sum
    }

    /// Raises (or lowers) the price of every item with `low_id <= id <= high_id`.
    ///
    /// Each new price is `old + trunc(old * rate / 100)` computed in integer
    /// cents; fractional pennies are discarded. Returns the sum of all price
    /// changes, which is negative for a negative rate. Descriptions and the
    /// index are untouched.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::{ItemStore, Money, HikeRate};
    ///
    /// let mut store = ItemStore::new();
    /// store.insert(1, Money::from_cents(1000), &[7]);
    /// store.insert(2, Money::from_cents(1), &[7]);
    ///
    /// let net = store.price_hike(1, 2, HikeRate::from_percent(10));
    /// assert_eq!(net, Money::from_cents(100)); // 1.00 + 0.00
    /// assert_eq!(store.find(1), Money::from_cents(1100));
    /// assert_eq!(store.find(2), Money::from_cents(1));
    /// ```
    pub fn price_hike(&mut self, low_id: ItemId, high_id: ItemId, rate: HikeRate) -> Money {
        if low_id > high_id {
            trace!(low_id, high_id, "empty hike range");
            return Money::zero();
        }

        let mut net: i128 = 0;
        let mut touched = 0usize;
        for item in self.items.range_mut(low_id..=high_id).map(|(_, item)| item) {
            let old = item.price;
            let new = old.hiked(rate);
            net += new.cents() as i128 - old.cents() as i128;
            item.price = new;
            touched += 1;
        }

        let net = Money::from_cents(saturate_i64(net));
        debug!(low_id, high_id, %rate, touched, %net, "price hike applied");
        net
    }

    /// Removes the listed tags from an item's description.
    ///
    /// Returns the sum of the tags that were actually present and removed,
    /// or 0 when the id is absent. A tag listed twice is removed (and
    /// counted) once. The sum wraps on i64 overflow.
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::{ItemStore, Money};
    ///
    /// let mut store = ItemStore::new();
    /// store.insert(1, Money::from_cents(500), &[10, 20]);
    /// assert_eq!(store.remove_names(1, &[10, 99, 10]), 10);
    /// assert_eq!(store.find_min_price(10), Money::zero());
    /// ```
    pub fn remove_names(&mut self, id: ItemId, tags: &[Tag]) -> i64 {
        let Some(item) = self.items.get_mut(&id) else {
            trace!(id, "remove_names on absent item");
            return 0;
        };

        let removed: Vec<Tag> = tags
            .iter()
            .copied()
            .filter(|tag| item.tags.remove(tag))
            .collect();

        for &tag in &removed {
            self.unlink(tag, id);
        }

        let sum = wrapping_tag_sum(&removed);
        debug!(id, removed = removed.len(), sum, "tags removed");
        self.debug_assert_mirrored(id, &removed);
        sum
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the item's price, or zero if the id is absent.
    pub fn find(&self, id: ItemId) -> Money {
        self.items
            .get(&id)
            .map(|item| item.price)
            .unwrap_or_default()
    }

    /// Lowest price among items whose description has `tag`, or zero.
    pub fn find_min_price(&self, tag: Tag) -> Money {
        self.tagged_prices(tag).min().unwrap_or_default()
    }

    /// Highest price among items whose description has `tag`, or zero.
    pub fn find_max_price(&self, tag: Tag) -> Money {
        self.tagged_prices(tag).max().unwrap_or_default()
    }

    /// Counts items with `tag` whose price lies in `[low, high]` (inclusive).
    ///
    /// ## Example
    /// ```rust
    /// use mds_core::{ItemStore, Money};
    ///
    /// let mut store = ItemStore::new();
    /// store.insert(1, Money::from_cents(100), &[7]);
    /// store.insert(2, Money::from_cents(250), &[7]);
    /// store.insert(3, Money::from_cents(300), &[7]);
    ///
    /// assert_eq!(store.find_price_range(7, Money::from_cents(100), Money::from_cents(300)), 3);
    /// assert_eq!(store.find_price_range(7, Money::from_cents(101), Money::from_cents(299)), 1);
    /// ```
    pub fn find_price_range(&self, tag: Tag, low: Money, high: Money) -> i64 {
        if low > high {
            return 0;
        }
        self.tagged_prices(tag)
            .filter(|price| (low..=high).contains(price))
            .count() as i64
    }

    /// Returns the item record for an id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Checks whether an id is present.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct tags currently indexed.
    pub fn tag_count(&self) -> usize {
        self.index.len()
    }

    /// Ids of the items carrying `tag`, in id order.
    pub fn ids_with_tag(&self, tag: Tag) -> impl Iterator<Item = ItemId> + '_ {
        self.index
            .get(&tag)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    fn tagged_prices(&self, tag: Tag) -> impl Iterator<Item = Money> + '_ {
        self.ids_with_tag(tag).filter_map(move |id| {
            let item = self.items.get(&id);
            debug_assert!(item.is_some(), "index tag {tag} references missing item {id}");
            item.map(|item| item.price)
        })
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Checks the whole mirror invariant between table and index.
    ///
    /// ## Checks
    /// - Every tag of every item is indexed under that item's id
    /// - Every indexed id exists and carries the tag
    /// - No index entry is empty
    pub fn verify_consistency(&self) -> CoreResult<()> {
        for (&id, item) in &self.items {
            for &tag in &item.tags {
                let indexed = self.index.get(&tag).is_some_and(|ids| ids.contains(&id));
                if !indexed {
                    return Err(CoreError::IndexInconsistent {
                        id,
                        tag,
                        detail: "description tag missing from index".to_string(),
                    });
                }
            }
        }

        for (&tag, ids) in &self.index {
            if ids.is_empty() {
                return Err(CoreError::EmptyIndexEntry { tag });
            }
            for &id in ids {
                match self.items.get(&id) {
                    None => {
                        return Err(CoreError::IndexInconsistent {
                            id,
                            tag,
                            detail: "index references missing item".to_string(),
                        })
                    }
                    Some(item) if !item.has_tag(tag) => {
                        return Err(CoreError::IndexInconsistent {
                            id,
                            tag,
                            detail: "indexed item lacks the tag".to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(())
    }

    /// Re-checks the entries a mutation of `id` touched (debug builds only).
    fn debug_assert_mirrored(&self, id: ItemId, touched: &[Tag]) {
        if !cfg!(debug_assertions) {
            return;
        }

        if let Some(item) = self.items.get(&id) {
            for tag in &item.tags {
                debug_assert!(
                    self.index.get(tag).is_some_and(|ids| ids.contains(&id)),
                    "item {id} carries tag {tag} but is not indexed under it"
                );
            }
        }
        for tag in touched {
            let carries = self.items.get(&id).is_some_and(|item| item.has_tag(*tag));
            let indexed = self.index.get(tag).is_some_and(|ids| ids.contains(&id));
            debug_assert_eq!(carries, indexed, "mirror broken for item {id}, tag {tag}");
            debug_assert!(
                self.index.get(tag).map_or(true, |ids| !ids.is_empty()),
                "empty index entry left for tag {tag}"
            );
        }
    }

    // =========================================================================
    // Index Maintenance
    // =========================================================================

    fn link(&mut self, tag: Tag, id: ItemId) {
        self.index.entry(tag).or_default().insert(id);
    }

    /// Removes `id` from the tag's set and prunes the entry once empty.
    fn unlink(&mut self, tag: Tag, id: ItemId) {
        match self.index.entry(tag) {
            Entry::Occupied(mut entry) => {
                let removed = entry.get_mut().remove(&id);
                debug_assert!(removed, "item {id} was not indexed under tag {tag}");
                if entry.get().is_empty() {
                    entry.remove();
                }
            }
            Entry::Vacant(_) => {
                if cfg!(debug_assertions) {
                    unreachable!("unlink of unindexed tag {tag} for item {id}");
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
