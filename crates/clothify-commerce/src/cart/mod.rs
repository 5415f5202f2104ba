//! Shopping cart.

mod cart;
mod pricing;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartPricing, LineItemPricing, PricingRules};
