//! LRU Tracker Module
//!
//! Keeps the recency order of cached keys independently of map iteration order.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
#[derive(Debug)]
pub struct LruTracker<K> {
    order: VecDeque<K>,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }
}

impl<K: Eq + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// An existing occurrence is removed first, so a key is never tracked twice.
    pub fn touch(&mut self, key: &K) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker. Unknown keys are ignored.
    pub fn remove(&mut self, key: &K) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        }
    }

    // == Remove At ==
    /// Removes and returns the key at `index` (0 = most recently used).
    pub fn remove_at(&mut self, index: usize) -> Option<K> {
        self.order.remove(index)
    }

    // == Get ==
    /// Returns the key at `index` (0 = most recently used).
    pub fn get(&self, index: usize) -> Option<&K> {
        self.order.get(index)
    }

    // == Iter ==
    /// Iterates keys from most to least recently used.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.order.iter()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &K) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}
