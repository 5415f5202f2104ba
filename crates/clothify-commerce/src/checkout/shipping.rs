//! Shipping methods.

use crate::cart::PricingRules;
use crate::ids::ShippingMethodId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A shipping method option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: String,
    pub price: Money,
    pub min_delivery_days: Option<i32>,
    pub max_delivery_days: Option<i32>,
    /// Whether the store's free-shipping threshold waives this price.
    #[serde(default)]
    pub free_over_threshold: bool,
}

impl ShippingMethod {
    pub fn new(id: impl Into<ShippingMethodId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            min_delivery_days: None,
            max_delivery_days: None,
            free_over_threshold: false,
        }
    }

    pub fn with_delivery_days(mut self, min: i32, max: i32) -> Self {
        self.min_delivery_days = Some(min);
        self.max_delivery_days = Some(max);
        self
    }

    /// The options offered at checkout.
    pub fn standard_options() -> Vec<ShippingMethod> {
        let mut standard =
            ShippingMethod::new("standard", "Standard Shipping", Money::usd(599)).with_delivery_days(5, 7);
        standard.free_over_threshold = true;
        vec![
            standard,
            ShippingMethod::new("express", "Express Shipping", Money::usd(1499)).with_delivery_days(2, 3),
            ShippingMethod::new("overnight", "Overnight", Money::usd(2999)).with_delivery_days(1, 1),
        ]
    }

    /// Charge for this method on an order of `subtotal`.
    pub fn rate_for(&self, subtotal: &Money, rules: &PricingRules) -> Money {
        if self.free_over_threshold && rules.qualifies_for_free_shipping(subtotal) {
            Money::zero(self.price.currency)
        } else {
            self.price
        }
    }

    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_delivery_days, self.max_delivery_days) {
            (Some(min), Some(max)) if min == max => {
                Some(format!("{} day{}", min, if min == 1 { "" } else { "s" }))
            }
            (Some(min), Some(max)) => Some(format!("{}-{} days", min, max)),
            (Some(min), None) => Some(format!("{}+ days", min)),
            (None, Some(max)) => Some(format!("Up to {} days", max)),
            (None, None) => None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

/// The method chosen for a checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingSelection {
    pub method: ShippingMethod,
}

impl ShippingSelection {
    pub fn from_method(method: &ShippingMethod) -> Self {
        Self {
            method: method.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.method.name
    }
}
