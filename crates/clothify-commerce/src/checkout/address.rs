//! Shipping address.

use serde::{Deserialize, Serialize};

/// Where an order ships and who to contact about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address1: String,
    /// Apartment, suite, etc.
    pub address2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            address1: address1.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            ..Default::default()
        }
    }

    /// Whether every required field has a non-blank value.
    pub fn is_complete(&self) -> bool {
        [
            &self.full_name,
            &self.email,
            &self.address1,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Format as a single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address1.clone()];
        if let Some(addr2) = &self.address2 {
            parts.push(addr2.clone());
        }
        parts.push(self.city.clone());
        if let Some(state) = &self.state {
            parts.push(state.clone());
        }
        parts.push(self.postal_code.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }
}
