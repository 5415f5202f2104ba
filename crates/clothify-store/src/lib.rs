//! Application state for the Clothify storefront.
//!
//! [`AppState`] ties the domain crates together: it loads the catalog from
//! the hosted database (or the bundled seed), keeps the cart and wishlist in
//! local storage, drives checkout and signs users in. Vendors and admins
//! reach their dashboards through [`VendorPortal`] and [`AdminPortal`].
//!
//! # Example
//!
//! ```rust
//! use clothify_store::{AppState, StoreConfig};
//! use clothify_commerce::prelude::*;
//!
//! let mut state = AppState::offline(StoreConfig::default()).unwrap();
//! let results = state.search(&FilterCriteria::new().with_query("jeans"));
//! let jeans = results.products[0].id.clone();
//!
//! state.add_to_cart(&jeans, Some("32"), 1).unwrap();
//! let pricing = state.cart_pricing().unwrap();
//! assert_eq!(pricing.subtotal, Money::usd(4999));
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod forms;
pub mod rows;
pub mod state;
pub mod vendor;

pub use admin::AdminPortal;
pub use config::{DatabaseConfig, SearchConfig, StorageConfig, StoreConfig};
pub use error::StoreError;
pub use forms::{address_values, checkout_form, rejection_form, vendor_product_form};
pub use rows::{ORDERS_TABLE, PRODUCTS_TABLE};
pub use state::{AppState, CatalogSource};
pub use vendor::VendorPortal;
