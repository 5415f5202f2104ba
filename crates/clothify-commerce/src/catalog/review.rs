//! Product reviews.

use crate::error::CommerceError;
use crate::ids::ReviewId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lowest and highest star ratings a review may carry.
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A customer review embedded in a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    /// Display name of the reviewer.
    pub author: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub comment: String,
    /// Calendar date the review was written (ISO `YYYY-MM-DD` on the wire).
    pub date: NaiveDate,
    /// Whether the reviewer bought the product.
    #[serde(default)]
    pub verified: bool,
    /// "Was this helpful?" votes.
    #[serde(default)]
    pub helpful: u32,
}

impl Review {
    /// Create a review, rejecting ratings outside 1-5.
    pub fn new(
        author: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, CommerceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(CommerceError::InvalidRating(rating));
        }
        Ok(Self {
            id: ReviewId::generate(),
            author: author.into(),
            rating,
            comment: comment.into(),
            date,
            verified: false,
            helpful: 0,
        })
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Record a helpful vote.
    pub fn mark_helpful(&mut self) {
        self.helpful = self.helpful.saturating_add(1);
    }
}
