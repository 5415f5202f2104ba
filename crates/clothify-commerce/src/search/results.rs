//! Search results and pagination.

use crate::catalog::Product;
use crate::search::facets::SearchFacets;
use serde::{Deserialize, Serialize};

/// Default page size for product grids.
pub const DEFAULT_PER_PAGE: usize = 24;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: usize,
    pub per_page: usize,
    /// Total number of items.
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    /// Create pagination info, clamping `page` into range and `per_page`
    /// to at least one.
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(per_page)
        };
        let page = page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }

    /// Page numbers to show in a pager, e.g. `[3, 4, 5, 6, 7]`.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        if self.total_pages <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let half = max_visible / 2;
        let start = self.page.saturating_sub(half).max(1);
        let end = (start + max_visible - 1).min(self.total_pages);
        let start = (end + 1).saturating_sub(max_visible).max(1);

        (start..=end).collect()
    }

    pub fn is_first(&self) -> bool {
        self.page == 1
    }

    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }

    /// First item number on this page (1-indexed), zero when empty.
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    pub fn end_item(&self) -> usize {
        (self.page * self.per_page).min(self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE, 0)
    }
}

/// Outcome of a catalog search. Always freshly derived, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResults {
    /// Matching products in result order.
    pub products: Vec<Product>,
    pub total_count: usize,
    pub facets: SearchFacets,
    /// "Did you mean" text for the query, if any.
    pub suggestion: Option<String>,
    /// Time spent in the search, in microseconds.
    pub query_time_us: u64,
}

/// One page of a result list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultPage<'a> {
    pub products: &'a [Product],
    pub pagination: Pagination,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Slice out page `page` (1-indexed) of `per_page` products.
    pub fn page(&self, page: usize, per_page: usize) -> ResultPage<'_> {
        let pagination = Pagination::new(page, per_page, self.products.len());
        let start = pagination.offset().min(self.products.len());
        let end = pagination.end_item().max(start);
        ResultPage {
            products: &self.products[start..end],
            pagination,
        }
    }

    /// Product names in result order.
    pub fn names(&self) -> Vec<&str> {
        self.products.iter().map(|p| p.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn results(n: usize) -> SearchResults {
        let products: Vec<Product> = (1..=n)
            .map(|i| Product::new(i.to_string(), format!("Item {i}"), Money::usd(1000), "Tops"))
            .collect();
        SearchResults {
            total_count: products.len(),
            products,
            ..Default::default()
        }
    }

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next);
        assert!(p.has_prev);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(5, 10, 45);
        assert!(!p.has_next);
        assert!(p.is_last());
        assert_eq!(p.start_item(), 41);
        assert_eq!(p.end_item(), 45);
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(9, 10, 15);
        assert_eq!(p.page, 2);
        let p = Pagination::new(0, 0, 3);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 1);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_pagination_page_numbers() {
        let p = Pagination::new(5, 10, 100);
        assert_eq!(p.page_numbers(5), vec![3, 4, 5, 6, 7]);
        let p = Pagination::new(1, 10, 100);
        assert_eq!(p.page_numbers(5), vec![1, 2, 3, 4, 5]);
        let p = Pagination::new(10, 10, 100);
        assert_eq!(p.page_numbers(5), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_slices() {
        let r = results(5);
        let page = r.page(2, 2);
        let ids: Vec<_> = page.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);

        let last = r.page(3, 2);
        assert_eq!(last.products.len(), 1);
        assert!(!last.pagination.has_next);
    }

    #[test]
    fn test_page_of_empty_results() {
        let r = SearchResults::default();
        let page = r.page(1, 24);
        assert!(page.products.is_empty());
        assert_eq!(page.pagination.start_item(), 0);
    }
}
