//! Remote database client for Clothify.
//!
//! Tables are accessed through the [`Database`] trait. [`RestDb`] talks to
//! the hosted database's REST interface through a [`Transport`];
//! [`MemoryDb`] keeps tables in process for offline use and tests.
//!
//! # Example
//!
//! ```rust
//! use clothify_data::{Database, DatabaseExt, MemoryDb, Query};
//! use serde_json::json;
//!
//! let db = MemoryDb::new();
//! db.insert("products", vec![json!({"name": "Linen Shirt", "status": "approved"})]).unwrap();
//!
//! let query = Query::table("products").eq("status", "approved");
//! let names: Vec<serde_json::Value> = db.select_as(&query).unwrap();
//! assert_eq!(names[0]["name"], "Linen Shirt");
//! ```

mod cache;
mod db;
mod error;
mod memory;
mod query;
mod request;
mod response;
mod rest;
mod transport;

pub use cache::{RequestCache, DEFAULT_REQUEST_TTL};
pub use db::{Database, DatabaseExt};
pub use error::DbError;
pub use memory::MemoryDb;
pub use query::{Condition, Op, Order, Query};
pub use request::Request;
pub use response::Response;
pub use rest::RestDb;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::Transport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Database, DatabaseExt, DbError, MemoryDb, Query, RestDb};
}
