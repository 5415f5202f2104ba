//! Local key-value storage for Clothify.
//!
//! [`Cache`] gives typed JSON access to a [`KvStore`] (process memory or a
//! JSON file on disk). [`TtlCache`] is an expiring in-memory map used for
//! request caching, and [`Session`] keeps versioned session payloads.
//!
//! # Example
//!
//! ```rust
//! use clothify_cache::{cache_key, Cache};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Cart {
//!     items: Vec<String>,
//! }
//!
//! let cache = Cache::in_memory();
//! let key = cache_key!("cart", "user123");
//!
//! cache.set(&key, &Cart { items: vec!["tee".into()] }).unwrap();
//! let cart: Option<Cart> = cache.get(&key).unwrap();
//! assert_eq!(cart.unwrap().items, vec!["tee"]);
//!
//! cache.delete(&key).unwrap();
//! assert!(!cache.exists(&key).unwrap());
//! ```

mod error;
mod kv;
mod session;
mod store;
mod ttl;

pub use error::CacheError;
pub use kv::Cache;
pub use session::{Session, SessionData, SessionId};
pub use store::{FileStore, KvStore, MemoryStore};
pub use ttl::TtlCache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvStore, Session, SessionId, TtlCache};
}
