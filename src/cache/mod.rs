//! Cache Module
//!
//! Bounded in-process cache with LRU capacity eviction, lazy TTL/TTI expiry
//! and an eviction veto delegate.

mod delegate;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use delegate::EvictionDelegate;
pub use entry::CacheEntry;
pub(crate) use lru::LruTracker;
pub use stats::CacheStats;
pub use store::BoundedCache;
