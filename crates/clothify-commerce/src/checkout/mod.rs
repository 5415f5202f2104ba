//! Checkout flow and orders.

mod address;
mod flow;
mod order;
mod shipping;

pub use address::ShippingAddress;
pub use flow::{CheckoutFlow, CheckoutStep, PaymentMethod, CHECKOUT_TTL_SECS};
pub use order::{generate_order_number, Order, OrderLineItem, OrderStatus};
pub use shipping::{ShippingMethod, ShippingSelection};
