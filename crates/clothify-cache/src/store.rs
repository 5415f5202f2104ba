//! Raw key-value stores.

use crate::CacheError;
use base64::{engine::general_purpose::STANDARD, Engine};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Byte-oriented key-value storage.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
    fn delete(&self, key: &str) -> Result<(), CacheError>;
    fn exists(&self, key: &str) -> Result<bool, CacheError>;
    /// All keys, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// Process-local store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.inner.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.inner.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.inner.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self.inner.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }
}

/// Store persisted as a single JSON document, rewritten on every mutation.
///
/// Values are base64-encoded so arbitrary bytes survive the round trip.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text).map_err(|e| {
                    CacheError::OpenError(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, String>>, CacheError> {
        self.entries
            .read()
            .map_err(|_| CacheError::StoreError("store lock poisoned".to_string()))
    }

    fn mutate<F>(&self, f: F) -> Result<(), CacheError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::StoreError("store lock poisoned".to_string()))?;
        f(&mut entries);
        self.persist(&entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.read()?;
        entries
            .get(key)
            .map(|encoded| {
                STANDARD
                    .decode(encoded)
                    .map_err(|e| CacheError::StoreError(format!("corrupt value for {}: {}", key, e)))
            })
            .transpose()
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let encoded = STANDARD.encode(value);
        self.mutate(|entries| {
            entries.insert(key.to_string(), encoded);
        })
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        if !self.exists(key)? {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read()?.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("b", b"2").unwrap();
        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        let shared = store.clone();
        shared.delete("a").unwrap();
        assert!(!store.exists("a").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("cart:guest", br#"{"items":[]}"#).unwrap();
        store.set("bin", &[0, 159, 146, 150]).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cart:guest").unwrap(), Some(br#"{"items":[]}"#.to_vec()));
        assert_eq!(reopened.get("bin").unwrap(), Some(vec![0, 159, 146, 150]));

        reopened.delete("bin").unwrap();
        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.keys().unwrap(), vec!["cart:guest"]);
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(CacheError::OpenError(_))));
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("s.json")).unwrap();
        store.delete("nothing").unwrap();
        assert!(!dir.path().join("s.json").exists());
    }
}
