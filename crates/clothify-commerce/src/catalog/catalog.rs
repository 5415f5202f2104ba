//! In-memory catalog with the lookups the storefront views need.

use crate::catalog::{seed_products, Product};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// An ordered collection of products.
///
/// Order is preserved as loaded; the search engine relies on it for stable
/// relevance ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The bundled seed catalog.
    pub fn seed() -> Self {
        Self::new(seed_products())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| &p.id == id)
    }

    /// Only the products shoppers may see.
    pub fn visible(&self) -> Catalog {
        Catalog::new(self.products.iter().filter(|p| p.is_visible()).cloned().collect())
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.products {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&p.category)) {
                seen.push(&p.category);
            }
        }
        seen
    }

    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_new).collect()
    }

    pub fn on_sale(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_on_sale()).collect()
    }

    /// Up to `limit` other products from the same category.
    pub fn related(&self, id: &ProductId, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get(id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|p| &p.id != id && p.category.eq_ignore_ascii_case(&product.category))
            .take(limit)
            .collect()
    }

    /// Insert a product, replacing any existing one with the same id in place.
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let idx = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(idx))
    }
}

impl From<Vec<Product>> for Catalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}
