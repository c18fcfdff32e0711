//! Cache Entry Module
//!
//! Defines a single stored entry and its TTL/TTI staleness rule.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored key/value pair with creation and last-access timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key, owned by the entry
    pub key: K,
    /// The stored value
    pub value: V,
    /// When the entry was created or last overwritten
    pub created: Instant,
    /// When the entry was last read or written
    pub accessed: Instant,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates an entry whose created and accessed timestamps are both `now`.
    pub fn new(key: K, value: V, now: Instant) -> Self {
        Self {
            key,
            value,
            created: now,
            accessed: now,
        }
    }

    // == Overwrite ==
    /// Replaces the value and resets both timestamps to `now`.
    pub fn overwrite(&mut self, value: V, now: Instant) {
        self.value = value;
        self.created = now;
        self.accessed = now;
    }

    // == Touch ==
    /// Records a read at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.accessed = now;
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived its TTL or TTI.
    ///
    /// A zero duration disables that limit. Both comparisons are strict, so an
    /// entry whose age equals the limit exactly is still fresh.
    pub fn is_stale(&self, now: Instant, time_to_live: Duration, time_to_idle: Duration) -> bool {
        let lived_too_long = !time_to_live.is_zero()
            && now.saturating_duration_since(self.created) > time_to_live;
        let idle_too_long = !time_to_idle.is_zero()
            && now.saturating_duration_since(self.accessed) > time_to_idle;
        lived_too_long || idle_too_long
    }
}
