//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
///
/// Search and facet computation are total and never produce these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    #[error("Size {size} is not available for {product}")]
    SizeUnavailable { product: String, size: String },

    #[error("A size must be selected for {0}")]
    SizeRequired(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid review rating: {0} (expected 1-5)")]
    InvalidRating(u8),

    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    #[error("Invalid order status transition from {from} to {to}")]
    InvalidOrderTransition { from: String, to: String },

    #[error("Invalid moderation transition from {from} to {to}")]
    InvalidModerationTransition { from: String, to: String },

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    #[error("Validation error: {0}")]
    Validation(String),
}
