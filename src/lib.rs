//! Bounded Cache - an in-process cache with capacity and time-based eviction
//!
//! Entries are evicted least-recently-used first once a count limit is
//! exceeded, and lazily expired on lookup after a time-to-live or time-to-idle.
//! An optional delegate can veto individual evictions.

pub mod cache;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use cache::{BoundedCache, CacheStats, EvictionDelegate};
pub use clock::{Clock, MockClock, SystemClock};
pub use command::Command;
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::Response;
pub use session::{PinnedKeys, Session};
