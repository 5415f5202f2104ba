//! Versioned session payloads persisted in a [`Cache`].

use crate::{Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Maximum retry attempts for optimistic concurrency control.
const MAX_UPDATE_RETRIES: u32 = 3;

/// A unique session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random session ID: `sess_` followed by 18 random
    /// bytes in URL-safe base64.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session record as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// Unix seconds.
    pub created_at: u64,
    /// Unix seconds.
    pub last_accessed: u64,
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Session manager over a cache, storing each session under
/// `session:{id}`.
///
/// # Example
///
/// ```rust
/// use clothify_cache::{Cache, Session, SessionId};
///
/// let sessions = Session::<Vec<String>>::new(Cache::in_memory());
/// let id = SessionId::generate();
/// sessions.update(&id, |recent| recent.push("linen".into())).unwrap();
/// assert_eq!(sessions.get(&id).unwrap(), Some(vec!["linen".to_string()]));
/// ```
pub struct Session<T> {
    cache: Cache,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Get session data, creating a default session if none exists.
    pub fn get_or_create(&self, id: &SessionId) -> Result<T, CacheError> {
        match self.get_versioned(id)? {
            Some(session) => Ok(session.data),
            None => {
                let data = T::default();
                self.write(id, &data, None)?;
                Ok(data)
            }
        }
    }

    pub fn get(&self, id: &SessionId) -> Result<Option<T>, CacheError> {
        Ok(self.get_versioned(id)?.map(|s| s.data))
    }

    /// Full record including version and timestamps.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get::<SessionData<T>>(&self.session_key(id))
    }

    /// Unconditional write; bumps the version and keeps `created_at`.
    pub fn set(&self, id: &SessionId, data: &T) -> Result<(), CacheError> {
        let current = self.get_versioned(id)?;
        self.write(id, data, current.as_ref())
    }

    fn write(
        &self,
        id: &SessionId,
        data: &T,
        previous: Option<&SessionData<T>>,
    ) -> Result<(), CacheError> {
        let now = unix_now();
        let session = SessionData {
            id: id.clone(),
            data: data.clone(),
            version: previous.map(|p| p.version + 1).unwrap_or(1),
            created_at: previous.map(|p| p.created_at).unwrap_or(now),
            last_accessed: now,
        };
        self.cache.set(&self.session_key(id), &session)
    }

    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.session_key(id))
    }

    pub fn exists(&self, id: &SessionId) -> Result<bool, CacheError> {
        self.cache.exists(&self.session_key(id))
    }

    /// Read-modify-write with optimistic concurrency control.
    ///
    /// The closure is applied to the current data (or the default). The
    /// write is abandoned and retried if the stored version moved while the
    /// closure ran; after `MAX_UPDATE_RETRIES` attempts this fails with
    /// [`CacheError::ConcurrentModification`].
    pub fn update<F>(&self, id: &SessionId, f: F) -> Result<T, CacheError>
    where
        F: Fn(&mut T),
    {
        for attempt in 0..MAX_UPDATE_RETRIES {
            let current = self.get_versioned(id)?;
            let expected = current.as_ref().map(|s| s.version);
            let mut data = current
                .as_ref()
                .map(|s| s.data.clone())
                .unwrap_or_default();

            f(&mut data);

            let latest = self.get_versioned(id)?;
            if latest.as_ref().map(|s| s.version) != expected {
                tracing::debug!(session = %id, attempt, "session changed during update, retrying");
                continue;
            }
            self.write(id, &data, latest.as_ref())?;
            return Ok(data);
        }

        Err(CacheError::ConcurrentModification(format!(
            "session {} changed {} times during update",
            id, MAX_UPDATE_RETRIES
        )))
    }

    fn session_key(&self, id: &SessionId) -> String {
        crate::cache_key!("session", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Visit {
        viewed: Vec<String>,
    }

    fn sessions() -> Session<Visit> {
        Session::new(Cache::in_memory())
    }

    #[test]
    fn test_session_id_from_str() {
        let id = SessionId::from("test-session");
        assert_eq!(id.as_str(), "test-session");
        assert_eq!(format!("{}", id), "test-session");
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();
        assert!(s.starts_with("sess_"));
        // 18 bytes base64 = 24 chars, plus "sess_"
        assert_eq!(s.len(), 29);
        assert_ne!(SessionId::generate(), id);
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new("serialize-me");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""serialize-me""#);
        assert_eq!(serde_json::from_str::<SessionId>(&json).unwrap(), id);
    }

    #[test]
    fn test_get_or_create() {
        let sessions = sessions();
        let id = SessionId::new("a");
        assert!(!sessions.exists(&id).unwrap());
        assert_eq!(sessions.get_or_create(&id).unwrap(), Visit::default());
        assert!(sessions.exists(&id).unwrap());
        assert_eq!(sessions.get_versioned(&id).unwrap().unwrap().version, 1);
    }

    #[test]
    fn test_set_bumps_version_and_keeps_created_at() {
        let sessions = sessions();
        let id = SessionId::new("a");
        sessions.set(&id, &Visit::default()).unwrap();
        let first = sessions.get_versioned(&id).unwrap().unwrap();

        let visit = Visit {
            viewed: vec!["3".into()],
        };
        sessions.set(&id, &visit).unwrap();
        let second = sessions.get_versioned(&id).unwrap().unwrap();

        assert_eq!(second.version, 2);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.data, visit);
    }

    #[test]
    fn test_update_applies_closure() {
        let sessions = sessions();
        let id = SessionId::new("a");
        sessions.update(&id, |v| v.viewed.push("1".into())).unwrap();
        let data = sessions.update(&id, |v| v.viewed.push("2".into())).unwrap();
        assert_eq!(data.viewed, vec!["1", "2"]);
        assert_eq!(sessions.get_versioned(&id).unwrap().unwrap().version, 2);
    }

    #[test]
    fn test_update_gives_up_under_constant_interference() {
        let cache = Cache::in_memory();
        let sessions = Session::<Visit>::new(cache.clone());
        let rival = Session::<Visit>::new(cache);
        let id = SessionId::new("a");
        let calls = Cell::new(0);

        let result = sessions.update(&id, |_| {
            calls.set(calls.get() + 1);
            rival.set(&id, &Visit::default()).unwrap();
        });

        assert!(matches!(result, Err(CacheError::ConcurrentModification(_))));
        assert_eq!(calls.get(), MAX_UPDATE_RETRIES);
    }

    #[test]
    fn test_delete() {
        let sessions = sessions();
        let id = SessionId::new("a");
        sessions.get_or_create(&id).unwrap();
        sessions.delete(&id).unwrap();
        assert_eq!(sessions.get(&id).unwrap(), None);
    }
}
