//! In-memory cache with per-entry expiry.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A thread-safe, TTL-based cache backed by `DashMap`.
///
/// Entries expire after the configured TTL. Expired entries are evicted
/// lazily on access, or explicitly via [`TtlCache::evict_expired`].
/// Clones share the same entries.
#[derive(Clone)]
pub struct TtlCache<K, V> {
    inner: Arc<DashMap<K, (V, Instant)>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a value if present and not expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.inner.get(key)?;
        let (value, inserted_at) = entry.value();
        if inserted_at.elapsed() < self.ttl {
            Some(value.clone())
        } else {
            drop(entry);
            let ttl = self.ttl;
            self.inner
                .remove_if(key, |_, (_, inserted_at)| inserted_at.elapsed() >= ttl);
            None
        }
    }

    /// Insert a value, resetting its expiry.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, (value, Instant::now()));
    }

    pub fn invalidate(&self, key: &K) {
        self.inner.remove(key);
    }

    /// Remove every entry whose key matches `predicate`. Returns how many
    /// were removed.
    pub fn invalidate_where<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&K) -> bool,
    {
        let before = self.inner.len();
        self.inner.retain(|k, _| !predicate(k));
        before.saturating_sub(self.inner.len())
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Remove all expired entries.
    pub fn evict_expired(&self) {
        let ttl = self.ttl;
        self.inner.retain(|_, (_, inserted_at)| inserted_at.elapsed() < ttl);
    }

    /// Number of stored entries, including ones that have expired but not
    /// yet been evicted.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
