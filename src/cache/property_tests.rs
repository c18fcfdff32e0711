//! Property-Based Tests for Cache Module
//!
//! Checks the cache against a plain recency-list model with proptest.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::BoundedCache;
use crate::clock::MockClock;

// == Strategies ==
/// Small key space so sequences revisit keys often.
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..16
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: u8, value: u32 },
    Get { key: u8 },
    Remove { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

// == Model ==
/// Reference behaviour: a Vec ordered most recently used first.
#[derive(Debug, Default)]
struct Model {
    order: Vec<(u8, u32)>,
    limit: usize,
}

impl Model {
    fn set(&mut self, key: u8, value: u32) {
        self.order.retain(|(k, _)| *k != key);
        self.order.insert(0, (key, value));
        if self.limit > 0 {
            self.order.truncate(self.limit);
        }
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        let entry = self.order.remove(pos);
        self.order.insert(0, entry);
        Some(entry.1)
    }

    fn remove(&mut self, key: u8) -> Option<u32> {
        let pos = self.order.iter().position(|(k, _)| *k == key)?;
        Some(self.order.remove(pos).1)
    }

    fn keys(&self) -> Vec<u8> {
        self.order.iter().map(|(k, _)| *k).collect()
    }
}

fn mock_cache(limit: usize) -> BoundedCache<u8, u32, MockClock> {
    BoundedCache::with_clock(limit, Duration::ZERO, Duration::ZERO, MockClock::new())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Without expiry or a delegate the cache behaves exactly like the model:
    /// same lookups, same recency order, and never more than `limit` entries.
    #[test]
    fn prop_matches_lru_model(
        limit in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut cache = mock_cache(limit);
        let mut model = Model { limit, ..Model::default() };

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key, value);
                    model.set(key, value);
                    if limit > 0 {
                        prop_assert!(cache.count() <= limit);
                    }
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(key));
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(cache.remove(&key), model.remove(key));
                }
            }
            prop_assert_eq!(cache.all_keys(), model.keys());
        }

        let values: Vec<u32> = model.order.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(cache.all_values(), values);
    }

    /// The recency order always holds exactly the stored keys, once each.
    #[test]
    fn prop_recency_order_matches_entries(
        limit in 0usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut cache = mock_cache(limit);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
                CacheOp::Remove { key } => { cache.remove(&key); }
            }

            let keys = cache.all_keys();
            let unique: HashSet<u8> = keys.iter().copied().collect();
            prop_assert_eq!(unique.len(), keys.len(), "duplicate key in recency order");
            prop_assert_eq!(keys.len(), cache.count());
            for key in &keys {
                prop_assert!(cache.contains_key(key));
            }
        }
    }

    /// Hits and misses add up to the number of lookups.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut cache = mock_cache(4);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Remove { key } => { cache.remove(&key); }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.count());
    }

    /// An entry is served right up to its TTL and gone just after it.
    #[test]
    fn prop_ttl_boundary(ttl_ms in 2u64..100_000, value in any::<u32>()) {
        let clock = MockClock::new();
        let ttl = Duration::from_millis(ttl_ms);
        let mut cache = BoundedCache::with_clock(8, ttl, Duration::ZERO, clock.clone());

        cache.set(1u8, value);

        clock.set_elapsed(ttl - Duration::from_millis(1));
        prop_assert_eq!(cache.get(&1), Some(value));

        clock.set_elapsed(ttl + Duration::from_millis(1));
        prop_assert_eq!(cache.get(&1), None);
        prop_assert_eq!(cache.count(), 0);
    }

    /// Pinned keys are never evicted, and the limit only stays exceeded when
    /// every remaining entry is pinned.
    #[test]
    fn prop_pinned_keys_survive(
        limit in 1usize..5,
        pinned in prop::collection::hash_set(key_strategy(), 0..4),
        keys in prop::collection::vec(key_strategy(), 1..60)
    ) {
        let mut cache = mock_cache(limit);
        let pins = {
            let pinned = pinned.clone();
            Arc::new(move |_: &u32, key: &u8| !pinned.contains(key))
        };
        cache.set_delegate(&pins);

        let mut written = HashSet::new();
        for key in keys {
            cache.set(key, u32::from(key));
            written.insert(key);

            for pinned_key in pinned.intersection(&written) {
                prop_assert!(cache.contains_key(pinned_key));
            }

            let pinned_present = cache
                .all_keys()
                .iter()
                .filter(|k| pinned.contains(*k))
                .count();
            if cache.count() > limit {
                prop_assert_eq!(cache.count(), pinned_present);
            }
        }
    }
}
