//! Store errors.

use clothify_auth::AuthError;
use clothify_cache::CacheError;
use clothify_commerce::CommerceError;
use clothify_data::DbError;
use clothify_forms::{FieldErrors, FormError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Validation failed: {}", summarize(.0))]
    Invalid(FieldErrors),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    #[error("Checkout has not been started")]
    CheckoutNotStarted,

    #[error("Checkout session expired")]
    CheckoutExpired,

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Invalid row from {table}: {source}")]
    Row {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Per-field messages when the error is a failed form validation.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StoreError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Whether signing in again could resolve the error.
    pub fn needs_sign_in(&self) -> bool {
        match self {
            StoreError::Auth(e) => matches!(e, AuthError::NotSignedIn | AuthError::SessionExpired),
            StoreError::Database(e) => e.is_unauthorized(),
            _ => false,
        }
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
