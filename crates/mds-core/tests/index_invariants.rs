//! Property tests: random operation sequences against a naive model.
//!
//! After every operation the store must agree with the model on the
//! operation's answer, and the table/index mirror must hold.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use mds_core::{HikeRate, ItemId, ItemStore, Money, Tag};

#[derive(Debug, Clone)]
enum Op {
    Insert(ItemId, i64, Vec<Tag>),
    Find(ItemId),
    Delete(ItemId),
    MinPrice(Tag),
    MaxPrice(Tag),
    PriceRange(Tag, i64, i64),
    Hike(ItemId, ItemId, i64),
    RemoveNames(ItemId, Vec<Tag>),
}

fn id() -> impl Strategy<Value = ItemId> {
    0i64..24
}

fn tag() -> impl Strategy<Value = Tag> {
    -4i64..16
}

fn tags() -> impl Strategy<Value = Vec<Tag>> {
    prop::collection::vec(tag(), 0..6)
}

fn cents() -> impl Strategy<Value = i64> {
    0i64..20_000
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (id(), cents(), tags()).prop_map(|(i, c, t)| Op::Insert(i, c, t)),
        1 => id().prop_map(Op::Find),
        1 => id().prop_map(Op::Delete),
        1 => tag().prop_map(Op::MinPrice),
        1 => tag().prop_map(Op::MaxPrice),
        1 => (tag(), cents(), cents()).prop_map(|(t, a, b)| Op::PriceRange(t, a, b)),
        1 => (id(), id(), -1_000_000i64..=2_000_000).prop_map(|(a, b, r)| Op::Hike(a, b, r)),
        2 => (id(), tags()).prop_map(|(i, t)| Op::RemoveNames(i, t)),
    ]
}

/// The obvious implementation: one map, linear scans for everything.
#[derive(Default)]
struct Model {
    items: BTreeMap<ItemId, (i64, BTreeSet<Tag>)>,
}

impl Model {
    fn apply(&mut self, op: &Op) -> i64 {
        match op {
            Op::Insert(id, cents, tags) => match self.items.get_mut(id) {
                Some(entry) => {
                    entry.0 = *cents;
                    if !tags.is_empty() {
                        entry.1 = tags.iter().copied().collect();
                    }
                    0
                }
                None => {
                    self.items.insert(*id, (*cents, tags.iter().copied().collect()));
                    1
                }
            },
            Op::Find(id) => self.items.get(id).map_or(0, |e| e.0),
            Op::Delete(id) => self.items.remove(id).map_or(0, |e| e.1.iter().sum()),
            Op::MinPrice(tag) => self.prices(*tag).min().unwrap_or(0),
            Op::MaxPrice(tag) => self.prices(*tag).max().unwrap_or(0),
            Op::PriceRange(tag, low, high) => {
                self.prices(*tag).filter(|p| low <= p && p <= high).count() as i64
            }
            Op::Hike(low, high, units) => {
                let mut net = 0;
                for (id, entry) in self.items.iter_mut() {
                    if id < low || id > high {
                        continue;
                    }
                    let delta = (entry.0 as i128 * *units as i128 / 1_000_000) as i64;
                    entry.0 += delta;
                    net += delta;
                }
                net
            }
            Op::RemoveNames(id, tags) => match self.items.get_mut(id) {
                Some(entry) => tags.iter().filter(|t| entry.1.remove(*t)).sum(),
                None => 0,
            },
        }
    }

    fn prices(&self, tag: Tag) -> impl Iterator<Item = i64> + '_ {
        self.items
            .values()
            .filter(move |e| e.1.contains(&tag))
            .map(|e| e.0)
    }
}

fn apply(store: &mut ItemStore, op: &Op) -> i64 {
    match op {
        Op::Insert(id, cents, tags) => store.insert(*id, Money::from_cents(*cents), tags).flag(),
        Op::Find(id) => store.find(*id).cents(),
        Op::Delete(id) => store.delete(*id),
        Op::MinPrice(tag) => store.find_min_price(*tag).cents(),
        Op::MaxPrice(tag) => store.find_max_price(*tag).cents(),
        Op::PriceRange(tag, low, high) => {
            store.find_price_range(*tag, Money::from_cents(*low), Money::from_cents(*high))
        }
        Op::Hike(low, high, units) => store
            .price_hike(*low, *high, HikeRate::from_units(*units))
            .cents(),
        Op::RemoveNames(id, tags) => store.remove_names(*id, tags),
    }
}

proptest! {
    #[test]
    fn store_matches_model_and_stays_mirrored(ops in prop::collection::vec(op(), 1..80)) {
        let mut store = ItemStore::new();
        let mut model = Model::default();

        for op in &ops {
            let expected = model.apply(op);
            let actual = apply(&mut store, op);
            prop_assert_eq!(actual, expected, "diverged on {:?}", op);
            prop_assert!(store.verify_consistency().is_ok(), "mirror broken after {:?}", op);
        }

        prop_assert_eq!(store.len(), model.items.len());
        for (id, (cents, tags)) in &model.items {
            let item = store.get(*id).unwrap();
            prop_assert_eq!(item.price.cents(), *cents);
            prop_assert_eq!(&item.tags, tags);
        }
    }

    #[test]
    fn insert_find_delete_round_trip(
        id in id(),
        cents in cents(),
        tags in prop::collection::vec(1i64..1000, 0..8),
    ) {
        let mut store = ItemStore::new();
        let price = Money::from_cents(cents);

        prop_assert!(store.insert(id, price, &tags).is_new());
        prop_assert_eq!(store.find(id), price);

        let distinct: BTreeSet<Tag> = tags.iter().copied().collect();
        prop_assert_eq!(store.delete(id), distinct.iter().sum::<i64>());
        prop_assert!(store.find(id).is_zero());
        prop_assert_eq!(store.tag_count(), 0);
    }

    #[test]
    fn money_text_form_round_trips(cents in any::<i64>()) {
        let money = Money::from_cents(cents);
        let parsed: Money = money.to_string().parse().unwrap();
        prop_assert_eq!(parsed, money);
    }
}
