//! Form schemas and form state.

use crate::error::FormError;
use crate::rules::FieldRules;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Field name to error message. A missing entry means the field is valid.
pub type FieldErrors = BTreeMap<String, String>;

/// Ordered set of named fields and their rules.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldRules)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; re-adding a name replaces its rules in place.
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = rules,
            None => self.fields.push((name, rules)),
        }
        self
    }

    pub fn rules(&self, name: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules(name).is_some()
    }

    /// Validate one field's value.
    pub fn validate_field(&self, name: &str, value: &str) -> Result<Option<String>, FormError> {
        self.rules(name)
            .map(|rules| rules.check(value))
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Validate every schema field; absent values count as empty.
    pub fn validate<'a, F>(&self, value_of: F) -> FieldErrors
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.fields
            .iter()
            .filter_map(|(name, rules)| {
                rules
                    .check(value_of(name).unwrap_or(""))
                    .map(|message| (name.clone(), message))
            })
            .collect()
    }

    /// Validate a map of values.
    pub fn validate_map(&self, values: &HashMap<String, String>) -> FieldErrors {
        self.validate(|name| values.get(name).map(String::as_str))
    }

    /// Validate `(name, value)` pairs.
    pub fn validate_pairs(&self, pairs: &[(&str, String)]) -> FieldErrors {
        self.validate(|name| {
            pairs
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        })
    }
}

/// Live form state: values, touched fields and current errors.
///
/// Fields are validated when first touched (blur) and on every change
/// after that; `validate_all` checks everything before submit.
#[derive(Debug, Clone, Default)]
pub struct Form {
    schema: FormSchema,
    values: HashMap<String, String>,
    touched: HashSet<String>,
    errors: FieldErrors,
}

impl Form {
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    /// Set a value; touched fields are re-validated.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        if !self.schema.contains(name) {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.values.insert(name.to_string(), value.into());
        if self.touched.contains(name) {
            self.revalidate(name)?;
        }
        Ok(())
    }

    /// Mark a field touched and validate it.
    pub fn touch(&mut self, name: &str) -> Result<Option<&str>, FormError> {
        if !self.schema.contains(name) {
            return Err(FormError::UnknownField(name.to_string()));
        }
        self.touched.insert(name.to_string());
        self.revalidate(name)?;
        Ok(self.error(name))
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.contains(name)
    }

    /// Touch and validate every field. Returns whether the form is valid.
    pub fn validate_all(&mut self) -> bool {
        self.touched = self.schema.field_names().map(str::to_string).collect();
        self.errors = self.schema.validate_map(&self.values);
        tracing::debug!(errors = self.errors.len(), "validated form");
        self.errors.is_empty()
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether no field currently shows an error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Clear values, touched state and errors.
    pub fn reset(&mut self) {
        self.values.clear();
        self.touched.clear();
        self.errors.clear();
    }

    fn revalidate(&mut self, name: &str) -> Result<(), FormError> {
        let value = self.values.get(name).map(String::as_str).unwrap_or("");
        match self.schema.validate_field(name, value)? {
            Some(message) => {
                self.errors.insert(name.to_string(), message);
            }
            None => {
                self.errors.remove(name);
            }
        }
        Ok(())
    }
}
