//! Cart and line item types.

use crate::cart::{CartPricing, LineItemPricing, PricingRules};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{LineItemId, ProductId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// A shopping cart. Lines are keyed by product and size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub currency: Currency,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product` in `size`.
    ///
    /// Returns an error if:
    /// - quantity is not positive
    /// - the product is out of stock
    /// - the product offers sizes and `size` is missing or not one of them
    /// - the line would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(
        &mut self,
        product: &Product,
        size: Option<&str>,
        quantity: i64,
    ) -> Result<LineItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if !product.in_stock {
            return Err(CommerceError::OutOfStock(product.name.clone()));
        }
        let size = resolve_size(product, size)?;

        if self.items.is_empty() {
            self.currency = product.price.currency;
        } else if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id && i.size == size)
        {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            existing.update_total()?;
            let id = existing.id.clone();
            self.touch();
            return Ok(id);
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let item = LineItem::new(product, size, quantity)?;
        let id = item.id.clone();
        self.items.push(item);
        self.touch();
        Ok(id)
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// Returns whether the line existed.
    pub fn update_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(line_item_id));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.items.iter_mut().find(|i| &i.id == line_item_id) {
            Some(item) => {
                item.quantity = quantity;
                item.update_total()?;
                self.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_item(&mut self, line_item_id: &LineItemId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != line_item_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_item(&self, line_item_id: &LineItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == line_item_id)
    }

    /// Line for `product_id` in `size`, matching sizes case-insensitively.
    pub fn find_line(&self, product_id: &ProductId, size: Option<&str>) -> Option<&LineItem> {
        self.items.iter().find(|i| {
            &i.product_id == product_id
                && match (i.size.as_deref(), size) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    (None, None) => true,
                    _ => false,
                }
        })
    }

    /// Price the cart with the flat shipping fee from `rules`.
    pub fn calculate_pricing(&self, rules: &PricingRules) -> Result<CartPricing, CommerceError> {
        self.price(rules, None)
    }

    /// Price the cart with an explicit shipping charge, e.g. the chosen
    /// shipping method. An empty cart still ships for nothing.
    pub fn calculate_pricing_with_shipping(
        &self,
        rules: &PricingRules,
        shipping: Money,
    ) -> Result<CartPricing, CommerceError> {
        self.price(rules, Some(shipping))
    }

    fn price(
        &self,
        rules: &PricingRules,
        shipping_override: Option<Money>,
    ) -> Result<CartPricing, CommerceError> {
        if self.items.is_empty() {
            return Ok(CartPricing::empty(self.currency));
        }

        let line_items: Vec<LineItemPricing> = self
            .items
            .iter()
            .map(|item| LineItemPricing {
                line_item_id: item.id.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                subtotal: item.total_price,
            })
            .collect();

        let subtotal = Money::try_sum(self.items.iter().map(|i| &i.total_price), self.currency)
            .ok_or(CommerceError::Overflow)?;
        let shipping_total = match shipping_override {
            Some(shipping) => shipping,
            None => rules.shipping_for(&subtotal),
        };
        let tax_total = Money::new(rules.tax_for(&subtotal).amount_cents, self.currency);

        let grand_total = subtotal
            .try_add(&shipping_total)
            .and_then(|m| m.try_add(&tax_total))
            .ok_or_else(|| CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: shipping_total.currency.code().to_string(),
            })?;

        Ok(CartPricing {
            subtotal,
            shipping_total,
            tax_total,
            grand_total,
            line_items,
        })
    }

    /// Merge another cart into this one (e.g. a guest cart on sign-in).
    ///
    /// Quantities that would exceed MAX_QUANTITY_PER_ITEM are capped.
    pub fn merge(&mut self, other: Cart) -> Result<(), CommerceError> {
        if self.items.is_empty() {
            self.currency = other.currency;
        }
        for item in other.items {
            if let Some(existing) = self
                .items
                .iter_mut()
                .find(|i| i.product_id == item.product_id && i.size == item.size)
            {
                existing.quantity = existing
                    .quantity
                    .saturating_add(item.quantity)
                    .min(MAX_QUANTITY_PER_ITEM);
                existing.update_total()?;
            } else {
                self.items.push(item);
            }
        }
        self.touch();
        Ok(())
    }

    /// Drop lines whose product is gone or out of stock, and refresh unit
    /// prices from `products`. Returns the number of lines removed.
    pub fn reconcile(&mut self, products: &[Product]) -> Result<usize, CommerceError> {
        let before = self.items.len();
        self.items.retain(|item| {
            products
                .iter()
                .any(|p| p.id == item.product_id && p.in_stock)
        });
        for item in &mut self.items {
            if let Some(product) = products.iter().find(|p| p.id == item.product_id) {
                if product.price != item.unit_price {
                    item.unit_price = product.price;
                    item.update_total()?;
                }
            }
        }
        let removed = before - self.items.len();
        if removed > 0 {
            self.touch();
        }
        Ok(removed)
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp();
    }
}

fn resolve_size(product: &Product, size: Option<&str>) -> Result<Option<String>, CommerceError> {
    if product.sizes.is_empty() {
        return Ok(None);
    }
    let requested = size
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CommerceError::SizeRequired(product.name.clone()))?;
    product
        .find_size(requested)
        .map(|s| Some(s.to_string()))
        .ok_or_else(|| CommerceError::SizeUnavailable {
            product: product.name.clone(),
            size: requested.to_string(),
        })
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub product_name: String,
    /// Chosen size, canonical spelling.
    pub size: Option<String>,
    pub image: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    /// unit_price * quantity.
    pub total_price: Money,
}

impl LineItem {
    fn new(product: &Product, size: Option<String>, quantity: i64) -> Result<Self, CommerceError> {
        let total_price = product
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            id: LineItemId::generate(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            size,
            image: product.primary_image().map(str::to_string),
            quantity,
            unit_price: product.price,
            total_price,
        })
    }

    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.total_price = self
            .unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }
}
