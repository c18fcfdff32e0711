//! Cache Store Module
//!
//! The bounded cache: HashMap storage, explicit LRU order, capacity eviction on
//! `set`, lazy TTL/TTI expiry on `get`, and a delegate that can veto either.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, EvictionDelegate, LruTracker};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;

// == Bounded Cache ==
/// In-process cache with a count limit, optional time-to-live and optional
/// time-to-idle.
///
/// Expiry is lazy. A stale entry is only removed when `get` finds it, and the
/// count limit is only enforced by `set`. Enumeration and `count` include
/// entries that have expired but were not looked up since.
///
/// The cache is not synchronized. Every mutating operation takes `&mut self`;
/// sharing across threads requires an external lock around the whole cache.
pub struct BoundedCache<K, V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<K, V>>,
    /// Recency order, front = most recently used
    lru: LruTracker<K>,
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    count_limit: usize,
    /// Maximum age since creation, zero = disabled
    time_to_live: Duration,
    /// Maximum time since last access, zero = disabled
    time_to_idle: Duration,
    delegate: Option<Weak<dyn EvictionDelegate<K, V>>>,
    clock: C,
}

impl<K, V> BoundedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructors ==
    /// Creates a cache holding at most `count_limit` entries (0 = unbounded)
    /// with no time-based expiry.
    pub fn new(count_limit: usize) -> Self {
        Self::with_expiry(count_limit, Duration::ZERO, Duration::ZERO)
    }

    /// Creates a cache with a count limit, a time-to-live and a time-to-idle.
    ///
    /// A zero duration disables the corresponding limit.
    pub fn with_expiry(count_limit: usize, time_to_live: Duration, time_to_idle: Duration) -> Self {
        Self::with_clock(count_limit, time_to_live, time_to_idle, SystemClock)
    }

    /// Creates a cache from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_expiry(config.count_limit, config.time_to_live, config.time_to_idle)
    }
}

impl<K, V, C> BoundedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(
        count_limit: usize,
        time_to_live: Duration,
        time_to_idle: Duration,
        clock: C,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            count_limit,
            time_to_live,
            time_to_idle,
            delegate: None,
            clock,
        }
    }

    // == Get ==
    /// Looks up `key`.
    ///
    /// A stale entry is removed and `None` returned, unless the delegate vetoes
    /// the expiry, in which case it is served like a fresh one. A successful
    /// lookup refreshes the entry's access time and makes it most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = self.clock.now();

        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            trace!("cache miss");
            return None;
        };

        if entry.is_stale(now, self.time_to_live, self.time_to_idle) {
            let delegate = self.live_delegate();
            if delegate_allows(delegate.as_deref(), entry) {
                self.entries.remove(key);
                self.lru.remove(key);
                self.stats.record_miss();
                self.stats.record_expiration();
                self.stats.set_total_entries(self.entries.len());
                debug!(remaining = self.entries.len(), "expired entry removed");
                return None;
            }
            self.stats.record_veto();
            debug!("expiry vetoed by delegate");
        }

        debug_assert!(self.lru.contains(key), "stored key missing from recency order");
        let entry = self.entries.get_mut(key)?;
        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        trace!("cache hit");
        Some(value)
    }

    // == Set ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// Overwriting resets both the creation and access time. Afterwards, while
    /// the count limit is exceeded, entries are evicted from least recently
    /// used upwards. Entries the delegate vetoes keep their position and the
    /// walk moves on, so the limit may remain exceeded when every candidate is
    /// vetoed. The entry written by this call is the last candidate.
    pub fn set(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.lru.touch(&key);

        match self.entries.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().overwrite(value, now),
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(CacheEntry::new(key, value, now));
            }
        }

        self.enforce_count_limit();
        debug_assert_eq!(self.lru.len(), self.entries.len());
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Removes `key` without consulting the delegate, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(entry.value)
    }

    // == Remove All ==
    /// Drops every entry. The delegate is not consulted.
    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Enumeration ==
    /// Returns keys from most to least recently used.
    ///
    /// Entries past their TTL/TTI are included until a `get` removes them.
    pub fn all_keys(&self) -> Vec<K> {
        self.lru.iter().cloned().collect()
    }

    /// Returns values in the same order as [`all_keys`](Self::all_keys).
    pub fn all_values(&self) -> Vec<V> {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Iterates `(key, value)` pairs from most to least recently used without
    /// touching recency or expiry.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.lru
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|entry| (&entry.key, &entry.value))
    }

    // == Count ==
    /// Number of stored entries, including expired ones not yet looked up.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks presence without evaluating staleness or changing recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    // == Configuration ==
    pub fn count_limit(&self) -> usize {
        self.count_limit
    }

    /// Changes the count limit. A lower limit is enforced on the next `set`.
    pub fn set_count_limit(&mut self, count_limit: usize) {
        self.count_limit = count_limit;
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Changes the time-to-live (zero disables it) for all entries.
    pub fn set_time_to_live(&mut self, time_to_live: Duration) {
        self.time_to_live = time_to_live;
    }

    pub fn time_to_idle(&self) -> Duration {
        self.time_to_idle
    }

    /// Changes the time-to-idle (zero disables it) for all entries.
    pub fn set_time_to_idle(&mut self, time_to_idle: Duration) {
        self.time_to_idle = time_to_idle;
    }

    // == Delegate ==
    /// Registers `delegate` without taking ownership of it.
    ///
    /// The cache keeps a `Weak` handle; once the caller drops every `Arc`, the
    /// cache falls back to evicting unconditionally.
    pub fn set_delegate<D>(&mut self, delegate: &Arc<D>)
    where
        D: EvictionDelegate<K, V> + 'static,
    {
        let weak: Weak<D> = Arc::downgrade(delegate);
        self.delegate = Some(weak);
    }

    /// Registers an already-downgraded delegate handle.
    pub fn set_delegate_weak(&mut self, delegate: Weak<dyn EvictionDelegate<K, V>>) {
        self.delegate = Some(delegate);
    }

    pub fn clear_delegate(&mut self) {
        self.delegate = None;
    }

    /// Returns true while a registered delegate is still alive.
    pub fn has_delegate(&self) -> bool {
        self.live_delegate().is_some()
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Zeroes the counters. Stored entries are untouched.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
        self.stats.set_total_entries(self.entries.len());
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Capacity Eviction ==
    fn enforce_count_limit(&mut self) {
        if self.count_limit == 0 || self.entries.len() <= self.count_limit {
            return;
        }

        let delegate = self.live_delegate();
        let mut cursor = self.lru.len();

        while self.entries.len() > self.count_limit && cursor > 0 {
            cursor -= 1;
            let Some(key) = self.lru.get(cursor) else {
                break;
            };
            let allowed = self
                .entries
                .get(key)
                .map_or(true, |entry| delegate_allows(delegate.as_deref(), entry));

            if allowed {
                if let Some(key) = self.lru.remove_at(cursor) {
                    self.entries.remove(&key);
                    self.stats.record_eviction();
                    debug!(remaining = self.entries.len(), "evicted least recently used entry");
                }
            } else {
                self.stats.record_veto();
                debug!(position = cursor, "eviction vetoed by delegate");
            }
        }

        if self.entries.len() > self.count_limit {
            debug!(
                count = self.entries.len(),
                count_limit = self.count_limit,
                "count limit exceeded, remaining entries are pinned by the delegate"
            );
        }
    }

    fn live_delegate(&self) -> Option<Arc<dyn EvictionDelegate<K, V>>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }
}

/// An absent or dropped delegate always allows eviction.
fn delegate_allows<K, V>(
    delegate: Option<&(dyn EvictionDelegate<K, V> + 'static)>,
    entry: &CacheEntry<K, V>,
) -> bool {
    delegate.map_or(true, |delegate| delegate.should_evict(&entry.value, &entry.key))
}

impl<K, V, C> fmt::Debug for BoundedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("count", &self.entries.len())
            .field("count_limit", &self.count_limit)
            .field("time_to_live", &self.time_to_live)
            .field("time_to_idle", &self.time_to_idle)
            .field("has_delegate", &self.delegate.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}
