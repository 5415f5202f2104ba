//! Text relevance scoring.

use crate::catalog::Product;

pub const NAME_CONTAINS: u32 = 10;
pub const NAME_PREFIX: u32 = 5;
pub const CATEGORY_CONTAINS: u32 = 5;
pub const DESCRIPTION_CONTAINS: u32 = 2;
pub const SIZE_CONTAINS: u32 = 1;

/// Score `product` against an already lowercased, non-empty query.
pub fn relevance_score(product: &Product, query: &str) -> u32 {
    let name = product.name.to_lowercase();
    let mut score = 0;

    if name.contains(query) {
        score += NAME_CONTAINS;
        if name.starts_with(query) {
            score += NAME_PREFIX;
        }
    }
    if product.category.to_lowercase().contains(query) {
        score += CATEGORY_CONTAINS;
    }
    if product.description.to_lowercase().contains(query) {
        score += DESCRIPTION_CONTAINS;
    }
    if product.sizes.iter().any(|s| s.to_lowercase().contains(query)) {
        score += SIZE_CONTAINS;
    }
    score
}
