//! Filter criteria for a catalog search.

use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Category value the storefront uses for "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Explicit sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep relevance order.
    #[default]
    Relevance,
    /// Name, A to Z.
    Name,
    /// Price, low to high.
    Price,
    /// Newest first, by identifier.
    Newest,
    /// Most popular first; price stands in for popularity.
    Popularity,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Newest => "newest",
            SortKey::Popularity => "popularity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Relevance => "Relevance",
            SortKey::Name => "Name",
            SortKey::Price => "Price",
            SortKey::Newest => "Newest",
            SortKey::Popularity => "Popularity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relevance" => Some(SortKey::Relevance),
            "name" => Some(SortKey::Name),
            "price" => Some(SortKey::Price),
            "newest" => Some(SortKey::Newest),
            "popularity" | "popular" => Some(SortKey::Popularity),
            _ => None,
        }
    }
}

/// Direction applied on top of a sort key's natural order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Inclusive price interval; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn new(min: Option<Money>, max: Option<Money>) -> Self {
        Self { min, max }
    }

    /// Whether `price` lies within the interval. An inverted interval
    /// contains nothing.
    pub fn contains(&self, price: &Money) -> bool {
        let above_min = self
            .min
            .map(|m| price.amount_cents >= m.amount_cents)
            .unwrap_or(true);
        let below_max = self
            .max
            .map(|m| price.amount_cents <= m.amount_cents)
            .unwrap_or(true);
        above_min && below_max
    }
}

/// What the shopper asked for. Every field is optional; an absent field
/// applies no predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
    /// Requested sizes; a product matches if it offers any of them.
    #[serde(default)]
    pub sizes: Vec<String>,
    pub in_stock: Option<bool>,
    pub min_rating: Option<f64>,
    pub brand: Option<String>,
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    /// Add a requested size; duplicates (ignoring case) are dropped.
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        let size = size.into();
        if !self.sizes.iter().any(|s| s.eq_ignore_ascii_case(&size)) {
            self.sizes.push(size);
        }
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = Some(in_stock);
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Some(key);
        self.direction = direction;
        self
    }

    /// The trimmed, lowercased search text, if any remains.
    pub fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// The category filter, ignoring blanks and the "all" sentinel.
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
    }

    /// The brand filter, ignoring blanks.
    pub fn active_brand(&self) -> Option<&str> {
        self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    /// Whether any filter beyond text search is set.
    pub fn has_filters(&self) -> bool {
        self.active_category().is_some()
            || self.price_range.is_some()
            || !self.sizes.is_empty()
            || self.in_stock.is_some()
            || self.min_rating.is_some()
            || self.active_brand().is_some()
    }

    /// Parse criteria from a URL query string such as
    /// `q=dress&size=M&size=L&max_price=100&sort=price&dir=desc`.
    ///
    /// Unknown keys and unparsable values are ignored.
    pub fn from_query_string(qs: &str) -> Self {
        let mut criteria = FilterCriteria::new();
        let mut min_price = None;
        let mut max_price = None;

        for (key, value) in form_urlencoded::parse(qs.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "q" => criteria.query = Some(value.into_owned()),
                "category" => criteria.category = Some(value.into_owned()),
                "min_price" => min_price = parse_price(&value),
                "max_price" => max_price = parse_price(&value),
                "size" => criteria = criteria.with_size(value.into_owned()),
                "in_stock" => criteria.in_stock = value.parse().ok(),
                "min_rating" => criteria.min_rating = value.parse().ok(),
                "brand" => criteria.brand = Some(value.into_owned()),
                "sort" => criteria.sort = SortKey::from_str(&value),
                "dir" => {
                    if value.eq_ignore_ascii_case("desc") {
                        criteria.direction = SortDirection::Desc;
                    }
                }
                _ => {}
            }
        }

        if min_price.is_some() || max_price.is_some() {
            criteria.price_range = Some(PriceRange::new(min_price, max_price));
        }
        criteria
    }

    /// Render criteria as a URL query string; inverse of `from_query_string`.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &self.query {
            out.append_pair("q", q);
        }
        if let Some(category) = &self.category {
            out.append_pair("category", category);
        }
        if let Some(range) = &self.price_range {
            if let Some(min) = range.min {
                out.append_pair("min_price", &min.display_amount());
            }
            if let Some(max) = range.max {
                out.append_pair("max_price", &max.display_amount());
            }
        }
        for size in &self.sizes {
            out.append_pair("size", size);
        }
        if let Some(in_stock) = self.in_stock {
            out.append_pair("in_stock", if in_stock { "true" } else { "false" });
        }
        if let Some(rating) = self.min_rating {
            out.append_pair("min_rating", &rating.to_string());
        }
        if let Some(brand) = &self.brand {
            out.append_pair("brand", brand);
        }
        if let Some(sort) = self.sort {
            out.append_pair("sort", sort.as_str());
        }
        if self.direction == SortDirection::Desc {
            out.append_pair("dir", self.direction.as_str());
        }
        out.finish()
    }

    /// Cache key identifying equivalent searches.
    pub fn cache_key(&self) -> String {
        let mut canonical = self.clone();
        canonical.query = self.normalized_query();
        canonical.sizes = self.sizes.iter().map(|s| s.to_lowercase()).collect();
        canonical.sizes.sort();
        format!("search:{}", canonical.to_query_string())
    }
}

fn parse_price(value: &str) -> Option<Money> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| Money::from_decimal(v, Currency::USD))
}
