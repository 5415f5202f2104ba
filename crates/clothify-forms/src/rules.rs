//! Per-field rule sets.

use crate::error::FormError;
use crate::validators::BuiltIn;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A custom check returning an error message, or `None` when valid.
pub type CustomValidator = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Identifies a rule for message overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    /// The value must parse as a number because `min` or `max` is set.
    Number,
    Min,
    Max,
    Pattern,
    Email,
    Phone,
    Url,
}

impl RuleKind {
    fn for_builtin(built_in: BuiltIn) -> Self {
        match built_in {
            BuiltIn::Email => RuleKind::Email,
            BuiltIn::Phone => RuleKind::Phone,
            BuiltIn::Url => RuleKind::Url,
        }
    }
}

/// Rules for one field. Every rule is optional.
#[derive(Clone, Default)]
pub struct FieldRules {
    pub required: bool,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
    pub built_in: Option<BuiltIn>,
    pub custom: Option<CustomValidator>,
    messages: HashMap<RuleKind, String>,
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("built_in", &self.built_in)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Compile `pattern`; `field` names the field in the error.
    pub fn pattern(mut self, field: &str, pattern: &str) -> Result<Self, FormError> {
        let regex = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
            field: field.to_string(),
            source,
        })?;
        self.pattern = Some(regex);
        Ok(self)
    }

    pub fn with_regex(mut self, regex: Regex) -> Self {
        self.pattern = Some(regex);
        self
    }

    pub fn email(mut self) -> Self {
        self.built_in = Some(BuiltIn::Email);
        self
    }

    pub fn phone(mut self) -> Self {
        self.built_in = Some(BuiltIn::Phone);
        self
    }

    pub fn url(mut self) -> Self {
        self.built_in = Some(BuiltIn::Url);
        self
    }

    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    /// Replace the default message for `kind`.
    pub fn message(mut self, kind: RuleKind, message: impl Into<String>) -> Self {
        self.messages.insert(kind, message.into());
        self
    }

    /// Check `value`, returning the first failing rule's message.
    ///
    /// Order: required, length, numeric bounds, pattern, built-in, custom.
    /// An empty value passes unless the field is required.
    pub fn check(&self, value: &str) -> Option<String> {
        if value.trim().is_empty() {
            return self
                .required
                .then(|| self.message_for(RuleKind::Required, || "This field is required".into()));
        }

        let length = value.chars().count();
        if let Some(n) = self.min_length {
            if length < n {
                return Some(self.message_for(RuleKind::MinLength, || {
                    format!("Must be at least {} characters", n)
                }));
            }
        }
        if let Some(n) = self.max_length {
            if length > n {
                return Some(self.message_for(RuleKind::MaxLength, || {
                    format!("Must be no more than {} characters", n)
                }));
            }
        }

        if self.min.is_some() || self.max.is_some() {
            let Some(number) = value.trim().parse::<f64>().ok().filter(|n| !n.is_nan()) else {
                return Some(self.message_for(RuleKind::Number, || "Must be a valid number".into()));
            };
            if let Some(min) = self.min {
                if number < min {
                    return Some(self.message_for(RuleKind::Min, || format!("Must be at least {}", min)));
                }
            }
            if let Some(max) = self.max {
                if number > max {
                    return Some(
                        self.message_for(RuleKind::Max, || format!("Must be no more than {}", max)),
                    );
                }
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                return Some(self.message_for(RuleKind::Pattern, || "Invalid format".into()));
            }
        }

        if let Some(built_in) = self.built_in {
            if !built_in.check(value) {
                return Some(self.message_for(RuleKind::for_builtin(built_in), || {
                    match built_in {
                        BuiltIn::Email => "Please enter a valid email address",
                        BuiltIn::Phone => "Please enter a valid phone number",
                        BuiltIn::Url => "Please enter a valid URL",
                    }
                    .to_string()
                }));
            }
        }

        self.custom.as_ref().and_then(|check| check(value))
    }

    fn message_for(&self, kind: RuleKind, default: impl FnOnce() -> String) -> String {
        self.messages.get(&kind).cloned().unwrap_or_else(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        let rules = FieldRules::new().required();
        assert_eq!(rules.check("").as_deref(), Some("This field is required"));
        assert_eq!(rules.check("   ").as_deref(), Some("This field is required"));
        assert_eq!(rules.check("x"), None);
    }

    #[test]
    fn test_empty_optional_skips_everything() {
        let rules = FieldRules::new()
            .min_length(3)
            .min(10.0)
            .email()
            .custom(|_| Some("always".into()));
        assert_eq!(rules.check(""), None);
    }

    #[test]
    fn test_length_counts_characters() {
        let rules = FieldRules::new().min_length(3).max_length(5);
        assert_eq!(rules.check("ab").as_deref(), Some("Must be at least 3 characters"));
        assert_eq!(rules.check("héllo"), None);
        assert_eq!(rules.check("toolong").as_deref(), Some("Must be no more than 5 characters"));
    }

    #[test]
    fn test_numeric_bounds() {
        let rules = FieldRules::new().min(1.0).max(99.5);
        assert_eq!(rules.check("abc").as_deref(), Some("Must be a valid number"));
        assert_eq!(rules.check("0").as_deref(), Some("Must be at least 1"));
        assert_eq!(rules.check("100").as_deref(), Some("Must be no more than 99.5"));
        assert_eq!(rules.check(" 42 "), None);
    }

    #[test]
    fn test_order_short_circuits() {
        // length fails before the email check is reached
        let rules = FieldRules::new().min_length(10).email();
        assert_eq!(rules.check("a@b.c").as_deref(), Some("Must be at least 10 characters"));
        assert_eq!(
            rules.check("not-an-email").as_deref(),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn test_pattern_then_builtin_then_custom() {
        let rules = FieldRules::new()
            .pattern("sku", r"^[A-Z]")
            .unwrap()
            .url()
            .custom(|v| v.ends_with('/').then(|| "No trailing slash".to_string()));
        assert_eq!(rules.check("https://x.io").as_deref(), Some("Invalid format"));
        assert_eq!(rules.check("Nope").as_deref(), Some("Please enter a valid URL"));
        assert_eq!(rules.check("HTTPS://x.io/").as_deref(), Some("No trailing slash"));
        assert_eq!(rules.check("HTTPS://x.io"), None);
    }

    #[test]
    fn test_phone_message() {
        let rules = FieldRules::new().phone();
        assert_eq!(
            rules.check("555-123-4567").as_deref(),
            Some("Please enter a valid phone number")
        );
        assert_eq!(rules.check("5551234567"), None);
    }

    #[test]
    fn test_message_override() {
        let rules = FieldRules::new()
            .required()
            .message(RuleKind::Required, "Tell us your name");
        assert_eq!(rules.check("").as_deref(), Some("Tell us your name"));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = FieldRules::new().pattern("zip", "(").unwrap_err();
        assert!(err.to_string().contains("zip"));
    }
}
