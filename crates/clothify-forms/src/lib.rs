//! Declarative form validation.
//!
//! Each field carries optional [`FieldRules`]. Rules run in a fixed order
//! (required, length, numeric bounds, pattern, built-in, custom) and the
//! first failure's message is reported. Empty optional fields are always
//! valid.
//!
//! ```rust
//! use clothify_forms::{FieldRules, FormSchema};
//!
//! let schema = FormSchema::new()
//!     .field("email", FieldRules::new().required().email())
//!     .field("phone", FieldRules::new().phone());
//! let errors = schema.validate_pairs(&[("email", "ada@".to_string())]);
//! assert_eq!(errors["email"], "Please enter a valid email address");
//! assert!(!errors.contains_key("phone"));
//! ```

pub mod error;
pub mod form;
pub mod rules;
pub mod validators;

pub use error::FormError;
pub use form::{FieldErrors, Form, FormSchema};
pub use rules::{CustomValidator, FieldRules, RuleKind};
pub use validators::{is_valid_email, is_valid_phone, is_valid_url, phone_digits, BuiltIn};
