//! Eviction Delegate Module
//!
//! Hook that lets the owner of a cache veto individual evictions.

// == Eviction Delegate ==
/// Consulted once per eviction candidate, before the entry is removed.
///
/// Covers both capacity eviction during `set` and TTL/TTI expiry during
/// `get`. Returning `false` keeps the entry. The default body has no opinion
/// and lets the eviction proceed.
///
/// The cache holds delegates through a `Weak` handle. Once the last `Arc` is
/// dropped the cache behaves as if no delegate were registered.
///
/// Implementations must not reach back into the cache that is calling them
/// (for example through a shared `Mutex` around it). The call happens while
/// the cache is mid-operation and reentrant access will deadlock or observe
/// inconsistent state.
///
/// Any `Fn(&V, &K) -> bool` closure is a delegate:
///
/// ```
/// use std::sync::Arc;
/// use bounded_cache::cache::BoundedCache;
///
/// let keep_admin = Arc::new(|_: &u32, key: &String| key != "admin");
///
/// let mut cache: BoundedCache<String, u32> = BoundedCache::new(1);
/// cache.set_delegate(&keep_admin);
/// cache.set("admin".to_string(), 1);
/// cache.set("guest".to_string(), 2);
///
/// assert_eq!(cache.get(&"admin".to_string()), Some(1));
/// assert_eq!(cache.all_keys(), vec!["admin".to_string()]);
/// ```
pub trait EvictionDelegate<K, V>: Send + Sync {
    /// Returns whether `key` may be evicted.
    fn should_evict(&self, _value: &V, _key: &K) -> bool {
        true
    }
}

impl<K, V, F> EvictionDelegate<K, V> for F
where
    F: Fn(&V, &K) -> bool + Send + Sync,
{
    fn should_evict(&self, value: &V, key: &K) -> bool {
        self(value, key)
    }
}
