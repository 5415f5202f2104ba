//! Newtype IDs for type-safe identifiers.
//!
//! Rows coming back from the hosted database carry their identifiers as
//! strings (numeric for seeded products, opaque for everything else), so
//! every id wraps a `String`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a new unique ID.
            pub fn generate() -> Self {
                Self(generate_id($prefix))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId, "prod");
define_id!(ReviewId, "rev");
define_id!(LineItemId, "line");
define_id!(OrderId, "ord");
define_id!(OrderLineItemId, "oli");
define_id!(ShippingMethodId, "ship");
define_id!(CheckoutId, "chk");
define_id!(UserId, "usr");

impl ProductId {
    /// Compare two product ids as creation order.
    ///
    /// Seeded and database-assigned ids are increasing integers, so they are
    /// compared numerically. Numeric ids sort before any other id; other ids
    /// compare as strings.
    pub fn creation_cmp(&self, other: &ProductId) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

/// Generate a prefixed id from the current time and random bits.
fn generate_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let entropy: u32 = rand::random();
    format!("{}_{:x}{:08x}", prefix, millis, entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("42");
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_generation_is_unique_and_prefixed() {
        let a = OrderId::generate();
        let b = OrderId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ord_"));
    }

    #[test]
    fn test_creation_cmp_numeric() {
        let nine = ProductId::new("9");
        let ten = ProductId::new("10");
        assert_eq!(nine.creation_cmp(&ten), Ordering::Less);
        // String order would say otherwise.
        assert!(nine.as_str() > ten.as_str());
    }

    #[test]
    fn test_creation_cmp_falls_back_to_strings() {
        let a = ProductId::new("prod_a");
        let b = ProductId::new("prod_b");
        assert_eq!(a.creation_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_creation_cmp_mixed_ids_is_consistent() {
        let nine = ProductId::new("9");
        let ten = ProductId::new("10");
        let text = ProductId::new("10a");
        assert_eq!(nine.creation_cmp(&ten), Ordering::Less);
        assert_eq!(ten.creation_cmp(&text), Ordering::Less);
        assert_eq!(nine.creation_cmp(&text), Ordering::Less);
        assert_eq!(text.creation_cmp(&nine), Ordering::Greater);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = UserId::new("usr_1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""usr_1""#);
    }
}
