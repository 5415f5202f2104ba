//! Facet counts over a filtered result set.

use crate::catalog::Product;
use crate::money::Money;
use crate::search::criteria::FilterCriteria;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The four fixed price buckets, in currency units: `[0,50) [50,100)
/// [100,200) [200,∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    Under50,
    From50To100,
    From100To200,
    Over200,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Under50,
        PriceBucket::From50To100,
        PriceBucket::From100To200,
        PriceBucket::Over200,
    ];

    /// Lower bound (inclusive) and upper bound (exclusive) in major units.
    pub fn bounds(&self) -> (i64, Option<i64>) {
        match self {
            PriceBucket::Under50 => (0, Some(50)),
            PriceBucket::From50To100 => (50, Some(100)),
            PriceBucket::From100To200 => (100, Some(200)),
            PriceBucket::Over200 => (200, None),
        }
    }

    /// Bucket holding `price`. Negative prices fall in the lowest bucket.
    pub fn for_price(price: &Money) -> Self {
        let per_major = price.currency.minor_per_major();
        Self::ALL
            .into_iter()
            .find(|bucket| match bucket.bounds().1 {
                Some(upper) => price.amount_cents < upper * per_major,
                None => true,
            })
            .unwrap_or(PriceBucket::Over200)
    }

    /// Stable identifier, e.g. `50-100`.
    pub fn key(&self) -> &'static str {
        match self {
            PriceBucket::Under50 => "0-50",
            PriceBucket::From50To100 => "50-100",
            PriceBucket::From100To200 => "100-200",
            PriceBucket::Over200 => "200+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Under50 => "Under $50",
            PriceBucket::From50To100 => "$50 to $100",
            PriceBucket::From100To200 => "$100 to $200",
            PriceBucket::Over200 => "$200 and up",
        }
    }

    /// Whether a requested price range falls entirely inside this bucket.
    fn covers(&self, criteria: &FilterCriteria) -> bool {
        let Some(range) = criteria.price_range else {
            return false;
        };
        let (lower, upper) = self.bounds();
        let min_ok = range
            .min
            .map(|m| m.amount_cents >= lower * m.currency.minor_per_major())
            .unwrap_or(lower == 0);
        let max_ok = match (range.max, upper) {
            (Some(m), Some(u)) => m.amount_cents < u * m.currency.minor_per_major(),
            (_, None) => true,
            (None, Some(_)) => false,
        };
        min_ok && max_ok
    }
}

/// Kind of facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetType {
    /// Discrete values (categories, sizes, brands).
    Terms,
    /// Numeric buckets (price).
    Range,
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValue {
    pub value: String,
    /// Filtered products carrying this value.
    pub count: usize,
    /// Whether the current criteria select this value.
    pub selected: bool,
}

/// A named facet with its values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    /// Field this facet filters on.
    pub field: String,
    pub facet_type: FacetType,
    pub values: Vec<FacetValue>,
}

impl Facet {
    pub fn terms(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            facet_type: FacetType::Terms,
            values: Vec::new(),
        }
    }

    pub fn range(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            facet_type: FacetType::Range,
            ..Self::terms(name, field)
        }
    }

    pub fn add_value(&mut self, value: impl Into<String>, count: usize, selected: bool) {
        self.values.push(FacetValue {
            value: value.into(),
            count,
            selected,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count for `value`, zero when absent.
    pub fn count_of(&self, value: &str) -> usize {
        self.values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.count)
            .unwrap_or(0)
    }

    /// Sum of all value counts.
    pub fn total(&self) -> usize {
        self.values.iter().map(|v| v.count).sum()
    }
}

/// Facet breakdown of a filtered result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFacets {
    pub categories: Facet,
    pub sizes: Facet,
    pub price_ranges: Facet,
    pub brands: Facet,
}

impl Default for SearchFacets {
    fn default() -> Self {
        Self {
            categories: Facet::terms("Category", "category"),
            sizes: Facet::terms("Size", "size"),
            price_ranges: Facet::range("Price", "price"),
            brands: Facet::terms("Brand", "brand"),
        }
    }
}

impl SearchFacets {
    /// Compute facets over `products`, flagging values `criteria` selects.
    pub fn compute(products: &[Product], criteria: &FilterCriteria) -> Self {
        let mut facets = SearchFacets::default();

        let selected_category = criteria.active_category();
        fill_terms(
            &mut facets.categories,
            products.iter().map(|p| vec![p.category.as_str()]),
            |value| selected_category.is_some_and(|c| c.eq_ignore_ascii_case(value)),
        );

        fill_terms(
            &mut facets.sizes,
            products.iter().map(|p| {
                let mut sizes: Vec<&str> = p.sizes.iter().map(String::as_str).collect();
                sizes.sort_unstable();
                sizes.dedup();
                sizes
            }),
            |value| criteria.sizes.iter().any(|s| s.eq_ignore_ascii_case(value)),
        );

        let selected_brand = criteria.active_brand();
        fill_terms(
            &mut facets.brands,
            products.iter().map(|p| p.brand_guess().into_iter().collect()),
            |value| selected_brand.is_some_and(|b| b.eq_ignore_ascii_case(value)),
        );

        let mut bucket_counts = [0usize; 4];
        for product in products {
            let bucket = PriceBucket::for_price(&product.price);
            if let Some(i) = PriceBucket::ALL.iter().position(|b| *b == bucket) {
                bucket_counts[i] += 1;
            }
        }
        for (bucket, count) in PriceBucket::ALL.iter().zip(bucket_counts) {
            if count > 0 {
                facets
                    .price_ranges
                    .add_value(bucket.key(), count, bucket.covers(criteria));
            }
        }

        facets
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.sizes.is_empty()
            && self.price_ranges.is_empty()
            && self.brands.is_empty()
    }

    /// All facets in display order.
    pub fn all(&self) -> [&Facet; 4] {
        [&self.categories, &self.sizes, &self.price_ranges, &self.brands]
    }
}

fn fill_terms<'a, I, F>(facet: &mut Facet, values_per_product: I, is_selected: F)
where
    I: Iterator<Item = Vec<&'a str>>,
    F: Fn(&str) -> bool,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for values in values_per_product {
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
    }

    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (value, count) in entries {
        facet.add_value(value, count, is_selected(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        vec![
            Product::new("1", "Summer Dress", Money::usd(5000), "Dresses").with_sizes(["S", "M"]),
            Product::new("2", "Winter Coat", Money::usd(25000), "Outerwear").with_sizes(["M", "L"]),
            Product::new("3", "Summer Top", Money::usd(3000), "Tops").with_sizes(["S", "S"]),
            Product::new("4", "Silk Gown", Money::usd(20000), "Dresses"),
        ]
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(PriceBucket::for_price(&Money::usd(4999)), PriceBucket::Under50);
        assert_eq!(PriceBucket::for_price(&Money::usd(5000)), PriceBucket::From50To100);
        assert_eq!(PriceBucket::for_price(&Money::usd(19999)), PriceBucket::From100To200);
        assert_eq!(PriceBucket::for_price(&Money::usd(20000)), PriceBucket::Over200);
    }

    #[test]
    fn test_term_counts_and_order() {
        let facets = SearchFacets::compute(&products(), &FilterCriteria::new());
        let categories: Vec<_> = facets
            .categories
            .values
            .iter()
            .map(|v| (v.value.as_str(), v.count))
            .collect();
        assert_eq!(categories, vec![("Dresses", 2), ("Outerwear", 1), ("Tops", 1)]);

        // duplicate size tokens on one product count once
        assert_eq!(facets.sizes.count_of("S"), 2);
        assert_eq!(facets.sizes.count_of("M"), 2);
        assert_eq!(facets.sizes.count_of("L"), 1);

        assert_eq!(facets.brands.count_of("Summer"), 2);
    }

    #[test]
    fn test_price_buckets_fixed_order_without_empties() {
        let facets = SearchFacets::compute(&products(), &FilterCriteria::new());
        let keys: Vec<_> = facets.price_ranges.values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(keys, vec!["0-50", "50-100", "200+"]);
        assert_eq!(facets.price_ranges.count_of("200+"), 2);
    }

    #[test]
    fn test_selected_flags() {
        let criteria = FilterCriteria::new()
            .with_category("dresses")
            .with_size("m")
            .with_price_range(Some(Money::usd(5000)), Some(Money::usd(9999)));
        let facets = SearchFacets::compute(&products(), &criteria);

        assert!(facets.categories.values.iter().find(|v| v.value == "Dresses").unwrap().selected);
        assert!(!facets.categories.values.iter().find(|v| v.value == "Tops").unwrap().selected);
        assert!(facets.sizes.values.iter().find(|v| v.value == "M").unwrap().selected);
        let mid = facets.price_ranges.values.iter().find(|v| v.value == "50-100").unwrap();
        assert!(mid.selected);
    }

    #[test]
    fn test_empty_input() {
        let facets = SearchFacets::compute(&[], &FilterCriteria::new());
        assert!(facets.is_empty());
        assert_eq!(facets.categories.total(), 0);
    }
}
