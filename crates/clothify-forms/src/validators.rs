//! Built-in semantic validators.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Compiled once at first use.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\+]?[1-9][\d]{0,15}$").expect("phone regex is valid"));

/// Built-in validator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltIn {
    Email,
    Phone,
    Url,
}

impl BuiltIn {
    pub fn check(&self, value: &str) -> bool {
        match self {
            BuiltIn::Email => is_valid_email(value),
            BuiltIn::Phone => is_valid_phone(value),
            BuiltIn::Url => is_valid_url(value),
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Digits of a phone number with every other character removed.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Phone check.
///
/// The pattern is matched against the raw input, not [`phone_digits`], so
/// formatted numbers such as `555-123-4567` or `+1 555 1234` are rejected.
pub fn is_valid_phone(value: &str) -> bool {
    // TODO: match against phone_digits(value) once stored profiles are re-validated
    PHONE_REGEX.is_match(value)
}

/// Absolute URL check (scheme required).
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
