//! Database client error types.

use thiserror::Error;

/// Errors that can occur when talking to the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// The request could not be sent or no response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid base URL or endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server rejected the credentials (401/403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other error response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A row was not a JSON object.
    #[error("Invalid row for table {table}: {message}")]
    InvalidRow { table: String, message: String },

    /// A write expected to return a row returned none.
    #[error("No row returned from {0}")]
    NoRowReturned(String),
}

impl From<url::ParseError> for DbError {
    fn from(e: url::ParseError) -> Self {
        DbError::InvalidUrl(e.to_string())
    }
}

impl DbError {
    /// Map an error status and body to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => DbError::Unauthorized { status, message },
            _ => DbError::Http { status, message },
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DbError::Unauthorized { .. })
    }
}
