//! Cart pricing rules and breakdowns.

use crate::ids::LineItemId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Store-wide shipping and tax settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingRules {
    pub currency: Currency,
    /// Flat shipping fee in minor units.
    pub flat_shipping_cents: i64,
    /// Subtotal (minor units) at or above which shipping is free.
    pub free_shipping_threshold_cents: Option<i64>,
    /// Tax as a percentage of the subtotal.
    pub tax_rate_percent: f64,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            flat_shipping_cents: 999,
            free_shipping_threshold_cents: Some(10_000),
            tax_rate_percent: 8.0,
        }
    }
}

impl PricingRules {
    pub fn flat_shipping(&self) -> Money {
        Money::new(self.flat_shipping_cents, self.currency)
    }

    /// Shipping charged for `subtotal`; nothing ships for an empty cart.
    pub fn shipping_for(&self, subtotal: &Money) -> Money {
        if subtotal.amount_cents <= 0 || self.qualifies_for_free_shipping(subtotal) {
            Money::zero(self.currency)
        } else {
            self.flat_shipping()
        }
    }

    pub fn qualifies_for_free_shipping(&self, subtotal: &Money) -> bool {
        self.free_shipping_threshold_cents
            .is_some_and(|threshold| subtotal.amount_cents >= threshold)
    }

    /// How much more the shopper must add to ship free.
    pub fn amount_to_free_shipping(&self, subtotal: &Money) -> Option<Money> {
        let threshold = self.free_shipping_threshold_cents?;
        let remaining = threshold - subtotal.amount_cents;
        (remaining > 0).then(|| Money::new(remaining, self.currency))
    }

    pub fn tax_for(&self, subtotal: &Money) -> Money {
        subtotal.percentage(self.tax_rate_percent)
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    pub subtotal: Money,
    pub shipping_total: Money,
    pub tax_total: Money,
    /// subtotal + shipping + tax.
    pub grand_total: Money,
    pub line_items: Vec<LineItemPricing>,
}

impl CartPricing {
    pub fn empty(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            shipping_total: Money::zero(currency),
            tax_total: Money::zero(currency),
            grand_total: Money::zero(currency),
            line_items: Vec::new(),
        }
    }

    pub fn ships_free(&self) -> bool {
        self.shipping_total.is_zero()
    }
}

/// Pricing for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    pub line_item_id: LineItemId,
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price * quantity.
    pub subtotal: Money,
}
