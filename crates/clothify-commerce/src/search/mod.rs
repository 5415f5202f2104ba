//! Product search.
//!
//! [`search`] is a pure function from a catalog and [`FilterCriteria`] to
//! ranked, faceted [`SearchResults`]. Debouncing lives at the caller
//! boundary in [`LiveSearch`].

mod criteria;
mod debounce;
mod engine;
mod facets;
mod fuzzy;
mod relevance;
mod results;
mod suggest;

pub use criteria::{FilterCriteria, PriceRange, SortDirection, SortKey, ALL_CATEGORIES};
pub use debounce::{Debouncer, LiveSearch, DEFAULT_DEBOUNCE};
pub use engine::{compare_products, matches_filters, search, sort_products, BASELINE_RELEVANCE};
pub use facets::{Facet, FacetType, FacetValue, PriceBucket, SearchFacets};
pub use fuzzy::{fuzzy_match, match_ratio, FUZZY_THRESHOLD};
pub use relevance::relevance_score;
pub use results::{Pagination, ResultPage, SearchResults, DEFAULT_PER_PAGE};
pub use suggest::suggest;
