//! Wishlist.

use crate::catalog::{Catalog, Product};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Saved products, in the order they were added. Each product appears once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Wishlist {
    pub product_ids: Vec<ProductId>,
    pub updated_at: i64,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product; returns false if it was already saved.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        self.product_ids.push(product_id);
        self.touch();
        true
    }

    /// Remove a product; returns whether it was saved.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.product_ids.len();
        self.product_ids.retain(|id| id != product_id);
        let removed = self.product_ids.len() < before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.remove(&product_id) {
            false
        } else {
            self.add(product_id)
        }
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.product_ids.clear();
        self.touch();
    }

    /// Saved products still present in `catalog`, in wishlist order.
    pub fn products<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        self.product_ids
            .iter()
            .filter_map(|id| catalog.get(id))
            .collect()
    }

    /// Fold another wishlist in, keeping this one's order first.
    pub fn merge(&mut self, other: Wishlist) {
        for id in other.product_ids {
            self.add(id);
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().timestamp();
    }
}
