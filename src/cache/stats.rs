//! Cache Statistics Module
//!
//! Tracks lookups, evictions, expirations and delegate vetoes.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing cache behaviour since construction or the last reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups for absent or expired keys
    pub misses: u64,
    /// Entries removed to satisfy the count limit
    pub evictions: u64,
    /// Entries removed because their TTL or TTI elapsed
    pub expirations: u64,
    /// Eviction candidates the delegate chose to keep
    pub vetoes: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_veto(&mut self) {
        self.vetoes += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
