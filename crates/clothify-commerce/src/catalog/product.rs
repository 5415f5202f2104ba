//! Product and moderation types.

use crate::catalog::Review;
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Moderation state of a product.
///
/// Seeded products are approved; products submitted by vendors wait in
/// `Pending` until an admin decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    #[default]
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "rejected" => Some(ModerationStatus::Rejected),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// Price before markdown, shown struck through when higher than `price`.
    #[serde(default)]
    pub original_price: Option<Money>,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Sizes offered, in display order.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Image URLs; the first is the primary image.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Cached average of `reviews`.
    #[serde(default)]
    pub rating: f64,
    /// Cached length of `reviews`.
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub status: ModerationStatus,
    /// Vendor that submitted the product, if any.
    #[serde(default)]
    pub vendor_id: Option<UserId>,
    /// Admin note recorded on rejection.
    #[serde(default)]
    pub moderation_note: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Create an approved, in-stock product with no extras.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            category: category.into(),
            description: String::new(),
            sizes: Vec::new(),
            images: Vec::new(),
            is_new: false,
            on_sale: false,
            in_stock: true,
            reviews: Vec::new(),
            rating: 0.0,
            review_count: 0,
            status: ModerationStatus::Approved,
            vendor_id: None,
            moderation_note: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the product as discounted from `original`.
    pub fn with_original_price(mut self, original: Money) -> Self {
        self.original_price = Some(original);
        self.on_sale = original.amount_cents > self.price.amount_cents;
        self
    }

    pub fn mark_new(mut self) -> Self {
        self.is_new = true;
        self
    }

    pub fn out_of_stock(mut self) -> Self {
        self.in_stock = false;
        self
    }

    /// Attach reviews and refresh the cached rating.
    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self.refresh_rating();
        self
    }

    /// Whether shoppers may see the product.
    pub fn is_visible(&self) -> bool {
        self.status == ModerationStatus::Approved
    }

    /// Whether the product is marked down, by flag or by price.
    pub fn is_on_sale(&self) -> bool {
        self.on_sale
            || self
                .original_price
                .map(|op| op.amount_cents > self.price.amount_cents)
                .unwrap_or(false)
    }

    /// Discount off the original price, in whole percent.
    pub fn discount_percentage(&self) -> Option<u32> {
        let original = self.original_price?;
        if original.amount_cents <= self.price.amount_cents || original.amount_cents == 0 {
            return None;
        }
        let savings = original.amount_cents - self.price.amount_cents;
        Some(((savings as f64 / original.amount_cents as f64) * 100.0).round() as u32)
    }

    /// Case-insensitive size lookup returning the canonical spelling.
    pub fn find_size(&self, size: &str) -> Option<&str> {
        self.sizes
            .iter()
            .find(|s| s.eq_ignore_ascii_case(size))
            .map(String::as_str)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// First word of the name, used as a brand guess.
    pub fn brand_guess(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }

    /// Append a review and refresh the cached rating.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.refresh_rating();
    }

    /// Recompute `rating` and `review_count` from `reviews`.
    pub fn refresh_rating(&mut self) {
        self.review_count = self.reviews.len() as u32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            let total: u32 = self.reviews.iter().map(|r| r.rating as u32).sum();
            total as f64 / self.reviews.len() as f64
        };
    }

    /// Approve a pending product.
    pub fn approve(&mut self) -> Result<(), CommerceError> {
        self.transition(ModerationStatus::Approved)?;
        self.moderation_note = None;
        Ok(())
    }

    /// Reject a pending product with a note for the vendor.
    pub fn reject(&mut self, note: impl Into<String>) -> Result<(), CommerceError> {
        self.transition(ModerationStatus::Rejected)?;
        self.moderation_note = Some(note.into());
        Ok(())
    }

    /// Put a rejected product back in the moderation queue.
    pub fn resubmit(&mut self) -> Result<(), CommerceError> {
        self.transition(ModerationStatus::Pending)
    }

    fn transition(&mut self, to: ModerationStatus) -> Result<(), CommerceError> {
        let allowed = matches!(
            (self.status, to),
            (ModerationStatus::Pending, ModerationStatus::Approved)
                | (ModerationStatus::Pending, ModerationStatus::Rejected)
                | (ModerationStatus::Rejected, ModerationStatus::Pending)
        );
        if !allowed {
            return Err(CommerceError::InvalidModerationTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}
