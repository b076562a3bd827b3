//! TTL cache for query results

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// A cache entry with its insertion time
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Time-bounded memo cache.
///
/// Entries stay valid for the configured TTL after insertion; `insert`
/// overwrites an existing entry and restarts its clock. Values must be cheap
/// to clone (wrap large values in `Arc`).
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the cached value if its entry is still inside the TTL window
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Insert a value, overwriting any prior entry for the key
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Drop all entries older than the TTL
    pub fn evict_expired(&mut self) {
        self.evict_expired_at(Instant::now());
    }

    pub(crate) fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            if now.duration_since(entry.inserted_at) < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    pub(crate) fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    pub(crate) fn evict_expired_at(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
