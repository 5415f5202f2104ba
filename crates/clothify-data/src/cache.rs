//! Response cache for read requests.

use crate::Response;
use clothify_cache::TtlCache;
use std::time::Duration;

/// Default lifetime of a cached response.
pub const DEFAULT_REQUEST_TTL: Duration = Duration::from_secs(60);

/// TTL cache of responses keyed by method, URL and body.
///
/// Owned by whoever builds the client and handed to it, so tests and
/// separate stores never share entries. Clones share entries.
#[derive(Clone)]
pub struct RequestCache {
    entries: TtlCache<String, Response>,
}

impl Default for RequestCache {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TTL)
    }
}

impl RequestCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: TtlCache::new(ttl),
        }
    }

    pub fn get(&self, key: &str) -> Option<Response> {
        let hit = self.entries.get(&key.to_string());
        tracing::debug!(key, hit = hit.is_some(), "request cache lookup");
        hit
    }

    /// Store a response. Expired entries are evicted first, so the cache
    /// holds at most what arrived within one TTL.
    pub fn insert(&self, key: String, response: Response) {
        self.entries.evict_expired();
        self.entries.insert(key, response);
    }

    /// Drop every cached response for `table`. Returns how many were removed.
    pub fn invalidate_table(&self, table: &str) -> usize {
        let marker = format!("/rest/v1/{}?", table);
        self.entries.invalidate_where(|key| key.contains(&marker))
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
