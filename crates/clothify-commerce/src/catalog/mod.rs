//! Product catalog module.
//!
//! Contains products, reviews, moderation state and the bundled seed data.

mod catalog;
mod product;
mod review;
mod seed;

pub use catalog::Catalog;
pub use product::{ModerationStatus, Product};
pub use review::{Review, MAX_RATING, MIN_RATING};
pub use seed::seed_products;
