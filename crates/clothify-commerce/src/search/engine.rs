//! The catalog search pipeline.

use crate::catalog::Product;
use crate::search::criteria::{FilterCriteria, SortDirection, SortKey};
use crate::search::facets::SearchFacets;
use crate::search::fuzzy::fuzzy_match;
use crate::search::relevance::relevance_score;
use crate::search::results::SearchResults;
use crate::search::suggest::suggest;
use std::cmp::Ordering;
use std::time::Instant;

/// Relevance given to every product when there is no text query.
pub const BASELINE_RELEVANCE: u32 = 1;

/// Run `criteria` against `catalog`.
///
/// Scores and retains products by text relevance, applies the categorical
/// filters, optionally re-sorts, then computes facets over what is left.
/// Total over its inputs: malformed criteria produce empty results.
pub fn search(catalog: &[Product], criteria: &FilterCriteria) -> SearchResults {
    let started = Instant::now();
    let query = criteria.normalized_query();

    let mut scored: Vec<(&Product, u32)> = match query.as_deref() {
        None => catalog.iter().map(|p| (p, BASELINE_RELEVANCE)).collect(),
        Some(q) => catalog
            .iter()
            .filter_map(|p| {
                let score = relevance_score(p, q);
                (score > 0 || text_fuzzy_match(p, q)).then_some((p, score))
            })
            .collect(),
    };
    if query.is_some() {
        scored.sort_by(|a, b| b.1.cmp(&a.1));
    }

    let mut products: Vec<Product> = scored
        .into_iter()
        .filter(|(p, _)| matches_filters(p, criteria))
        .map(|(p, _)| p.clone())
        .collect();

    if let Some(key) = criteria.sort.filter(|k| *k != SortKey::Relevance) {
        sort_products(&mut products, key, criteria.direction);
    }

    let facets = SearchFacets::compute(&products, criteria);
    let suggestion = query
        .as_ref()
        .and_then(|_| criteria.query.as_deref())
        .and_then(|raw| suggest(catalog, raw));

    let query_time_us = started.elapsed().as_micros() as u64;
    tracing::debug!(
        query = query.as_deref().unwrap_or(""),
        catalog = catalog.len(),
        matched = products.len(),
        query_time_us,
        "catalog search"
    );

    SearchResults {
        total_count: products.len(),
        products,
        facets,
        suggestion,
        query_time_us,
    }
}

fn text_fuzzy_match(product: &Product, query: &str) -> bool {
    fuzzy_match(&product.name, query)
        || fuzzy_match(&product.description, query)
        || fuzzy_match(&product.category, query)
}

/// Whether `product` passes every categorical filter in `criteria`.
/// The text query is not considered here.
pub fn matches_filters(product: &Product, criteria: &FilterCriteria) -> bool {
    if let Some(category) = criteria.active_category() {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(range) = &criteria.price_range {
        if !range.contains(&product.price) {
            return false;
        }
    }
    if !criteria.sizes.is_empty() {
        let offered = product
            .sizes
            .iter()
            .any(|s| criteria.sizes.iter().any(|want| want.eq_ignore_ascii_case(s)));
        if !offered {
            return false;
        }
    }
    if let Some(in_stock) = criteria.in_stock {
        if product.in_stock != in_stock {
            return false;
        }
    }
    if let Some(min_rating) = criteria.min_rating {
        if product.rating < min_rating {
            return false;
        }
    }
    if let Some(brand) = criteria.active_brand() {
        let brand = brand.to_lowercase();
        if !product.name.to_lowercase().contains(&brand)
            && !product.description.to_lowercase().contains(&brand)
        {
            return false;
        }
    }
    true
}

/// Natural ordering of two products under `key`.
pub fn compare_products(a: &Product, b: &Product, key: SortKey) -> Ordering {
    match key {
        SortKey::Relevance => Ordering::Equal,
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Price => a.price.amount_cents.cmp(&b.price.amount_cents),
        SortKey::Newest => b.id.creation_cmp(&a.id),
        SortKey::Popularity => b.price.amount_cents.cmp(&a.price.amount_cents),
    }
}

/// Stable sort by `key`; `Desc` reverses the comparator.
pub fn sort_products(products: &mut [Product], key: SortKey, direction: SortDirection) {
    products.sort_by(|a, b| {
        let ord = compare_products(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
