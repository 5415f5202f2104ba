//! Vendor product submissions.

use crate::catalog::{ModerationStatus, Product};
use crate::ids::{ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as a vendor enters it, before moderation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct VendorDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub original_price: Option<Money>,
    pub category: String,
    pub sizes: Vec<String>,
    pub image_url: Option<String>,
}

impl VendorDraft {
    pub fn new(name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            ..Default::default()
        }
    }

    /// Field values as a submission form sees them.
    pub fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("price", self.price.display_amount()),
            ("category", self.category.clone()),
            ("sizes", self.sizes.join(", ")),
            ("image_url", self.image_url.clone().unwrap_or_default()),
        ]
    }

    /// Build a pending product owned by `vendor`.
    pub fn into_product(self, id: ProductId, vendor: UserId) -> Product {
        let mut product = Product::new(id, self.name.trim(), self.price, self.category.trim())
            .with_description(self.description)
            .with_sizes(self.sizes)
            .with_images(self.image_url)
            .mark_new();
        if let Some(original) = self.original_price {
            product = product.with_original_price(original);
        }
        product.status = ModerationStatus::Pending;
        product.vendor_id = Some(vendor);
        product
    }

    /// Overwrite the editable fields of `product`.
    pub fn apply_to(&self, product: &mut Product) {
        product.name = self.name.trim().to_string();
        product.description = self.description.clone();
        product.price = self.price;
        product.category = self.category.trim().to_string();
        product.sizes = self.sizes.clone();
        product.images = self.image_url.iter().cloned().collect();
        product.original_price = self.original_price;
        product.on_sale = self
            .original_price
            .is_some_and(|op| op.amount_cents > self.price.amount_cents);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> VendorDraft {
        VendorDraft {
            description: "Organic cotton".into(),
            sizes: vec!["S".into(), "M".into()],
            image_url: Some("https://cdn.example.com/tee.jpg".into()),
            ..VendorDraft::new(" Everyday Tee ", Money::usd(1800), "T-Shirts")
        }
    }

    #[test]
    fn test_into_product_is_pending() {
        let product = draft().into_product(ProductId::new("v1"), UserId::new("vendor-1"));
        assert_eq!(product.name, "Everyday Tee");
        assert_eq!(product.status, ModerationStatus::Pending);
        assert_eq!(product.vendor_id, Some(UserId::new("vendor-1")));
        assert!(!product.is_visible());
        assert_eq!(product.primary_image(), Some("https://cdn.example.com/tee.jpg"));
    }

    #[test]
    fn test_form_values() {
        let values = draft().form_values();
        assert!(values.contains(&("price", "18.00".to_string())));
        assert!(values.contains(&("sizes", "S, M".to_string())));
    }

    #[test]
    fn test_apply_to() {
        let mut product = draft().into_product(ProductId::new("v1"), UserId::new("vendor-1"));
        let mut edited = draft();
        edited.price = Money::usd(1500);
        edited.original_price = Some(Money::usd(1800));
        edited.apply_to(&mut product);
        assert_eq!(product.price, Money::usd(1500));
        assert!(product.on_sale);
        assert_eq!(product.status, ModerationStatus::Pending);
    }
}
