//! Form schema errors.

use thiserror::Error;

/// Errors raised while building a form schema.
///
/// Validating values never errors; failures there are user-facing
/// messages in the error map.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}
