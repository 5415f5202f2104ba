//! Storefront domain types and logic for Clothify.
//!
//! - **Catalog**: products, reviews, moderation, the bundled seed catalog
//! - **Search**: relevance scoring, fuzzy matching, filters, facets, debounce
//! - **Cart / Wishlist**: line items keyed by product and size, pricing
//! - **Checkout**: multi-step flow, orders and their status sequence
//! - **Vendor**: product drafts submitted for moderation
//!
//! # Example
//!
//! ```rust
//! use clothify_commerce::prelude::*;
//!
//! let catalog = Catalog::seed();
//! let criteria = FilterCriteria::new()
//!     .with_query("summer")
//!     .with_price_range(None, Some(Money::usd(10_000)));
//! let results = search(catalog.products(), &criteria);
//! assert!(results.products.iter().all(|p| p.price.amount_cents <= 10_000));
//!
//! let mut cart = Cart::new();
//! cart.add_item(&results.products[0], Some("M"), 1).unwrap();
//! let pricing = cart.calculate_pricing(&PricingRules::default()).unwrap();
//! println!("Total: {}", pricing.grand_total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;
pub mod vendor;
pub mod wishlist;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{seed_products, Catalog, ModerationStatus, Product, Review};

    // Search
    pub use crate::search::{
        search, FilterCriteria, LiveSearch, Pagination, PriceRange, SearchFacets, SearchResults,
        SortDirection, SortKey,
    };

    // Cart
    pub use crate::cart::{Cart, CartPricing, LineItem, PricingRules};
    pub use crate::wishlist::Wishlist;

    // Checkout
    pub use crate::checkout::{
        CheckoutFlow, CheckoutStep, Order, OrderLineItem, OrderStatus, PaymentMethod,
        ShippingAddress, ShippingMethod, ShippingSelection,
    };

    pub use crate::vendor::VendorDraft;
}
