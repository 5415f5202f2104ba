//! Key-value store wrapper with automatic serialization.

use crate::store::{FileStore, KvStore, MemoryStore};
use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Type-safe cache over a [`KvStore`].
///
/// Values are stored as JSON. A cache may carry a namespace which is
/// prepended to every key as `"{namespace}:"`; clones and namespaced views
/// share the underlying store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KvStore>,
    namespace: Option<String>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Cache {
    /// Wrap an existing store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            namespace: None,
        }
    }

    /// Open a process-local cache.
    ///
    /// # Example
    ///
    /// ```rust
    /// let cache = clothify_cache::Cache::in_memory();
    /// cache.set("cart:guest", &vec![1, 2, 3]).unwrap();
    /// let items: Option<Vec<i32>> = cache.get("cart:guest").unwrap();
    /// assert_eq!(items, Some(vec![1, 2, 3]));
    /// ```
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open a cache persisted to a JSON file at `path`.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    /// A view of the same store with keys prefixed by `namespace`.
    pub fn namespaced(&self, namespace: &str) -> Self {
        let namespace = match &self.namespace {
            Some(outer) => format!("{}:{}", outer, namespace),
            None => namespace.to_string(),
        };
        Self {
            store: Arc::clone(&self.store),
            namespace: Some(namespace),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn full_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, key),
            None => key.to_string(),
        }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(&self.full_key(key))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Like [`Cache::get`], but a value that no longer deserializes is
    /// treated as absent and removed.
    pub fn get_or_discard<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get(key) {
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(key, error = %e, "discarding unreadable cached value");
                self.delete(key)?;
                Ok(None)
            }
            other => other,
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(&self.full_key(key), &bytes)
    }

    /// Delete a value from the cache. Missing keys are not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(&self.full_key(key))
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(&self.full_key(key))
    }

    /// Keys visible through this cache, with the namespace stripped.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        let keys = self.store.keys()?;
        Ok(match &self.namespace {
            Some(ns) => {
                let prefix = format!("{}:", ns);
                keys.into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => keys,
        })
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// use clothify_cache::cache_key;
///
/// let user_id = "user123";
/// assert_eq!(cache_key!("cart", user_id), "cart:user123");
/// assert_eq!(cache_key!("orders", user_id, 2), "orders:user123:2");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wishlist {
        product_ids: Vec<String>,
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::in_memory();
        let list = Wishlist {
            product_ids: vec!["3".into(), "9".into()],
        };
        cache.set("wishlist:guest", &list).unwrap();
        assert_eq!(cache.get::<Wishlist>("wishlist:guest").unwrap(), Some(list));
        assert_eq!(cache.get::<Wishlist>("wishlist:u1").unwrap(), None);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let root = Cache::in_memory();
        let carts = root.namespaced("cart");
        let wishlists = root.namespaced("wishlist");

        carts.set("guest", &1).unwrap();
        wishlists.set("guest", &2).unwrap();

        assert_eq!(carts.get::<i32>("guest").unwrap(), Some(1));
        assert_eq!(wishlists.get::<i32>("guest").unwrap(), Some(2));
        assert_eq!(carts.keys().unwrap(), vec!["guest"]);
        assert_eq!(root.keys().unwrap(), vec!["cart:guest", "wishlist:guest"]);
    }

    #[test]
    fn test_get_or_discard_drops_bad_json() {
        let cache = Cache::in_memory();
        cache.set("cart:guest", "not a cart").unwrap();
        assert!(cache.get::<Wishlist>("cart:guest").is_err());
        assert_eq!(cache.get_or_discard::<Wishlist>("cart:guest").unwrap(), None);
        assert!(!cache.exists("cart:guest").unwrap());
    }

    #[test]
    fn test_file_backed_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clothify.json");
        Cache::open_file(&path).unwrap().set("theme", "dark").unwrap();

        let reopened = Cache::open_file(&path).unwrap();
        assert_eq!(reopened.get::<String>("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_cache_key_macro() {
        let id = 42;
        assert_eq!(cache_key!("session", id), "session:42");
    }
}
