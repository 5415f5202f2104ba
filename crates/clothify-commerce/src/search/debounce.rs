//! Debounced live search.
//!
//! Callers pass `Instant`s in explicitly, so the same code runs under a UI
//! event loop, a terminal prompt or a test with a synthetic clock.

use crate::catalog::Product;
use crate::search::criteria::FilterCriteria;
use crate::search::engine::search;
use crate::search::results::SearchResults;
use std::time::{Duration, Instant};

/// Delay before a typed query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest submitted value until it has been stable for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value and restart the window.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes ready.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Release the pending value once the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.delay);
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Catalog search driven by keystrokes.
///
/// Text changes go through the debouncer; filter changes apply at once.
#[derive(Debug, Clone)]
pub struct LiveSearch {
    catalog: Vec<Product>,
    criteria: FilterCriteria,
    debouncer: Debouncer<String>,
    results: SearchResults,
}

impl LiveSearch {
    pub fn new(catalog: Vec<Product>, delay: Duration) -> Self {
        let criteria = FilterCriteria::new();
        let results = search(&catalog, &criteria);
        Self {
            catalog,
            criteria,
            debouncer: Debouncer::new(delay),
            results,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Results for the last applied criteria.
    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Record typed text; it is searched once it stops changing.
    pub fn set_query(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.submit(text.into(), now);
    }

    /// Apply the pending query if its window has elapsed, returning the
    /// fresh results. Returns `None` when nothing changed.
    pub fn poll(&mut self, now: Instant) -> Option<&SearchResults> {
        let query = self.debouncer.poll(now)?;
        self.criteria.query = Some(query);
        self.refresh();
        Some(&self.results)
    }

    /// Replace the filters, keeping the applied query, and search now.
    pub fn set_filters(&mut self, mut criteria: FilterCriteria) -> &SearchResults {
        criteria.query = self.criteria.query.take();
        self.criteria = criteria;
        self.refresh();
        &self.results
    }

    /// Swap the catalog and search again.
    pub fn set_catalog(&mut self, catalog: Vec<Product>) -> &SearchResults {
        self.catalog = catalog;
        self.refresh();
        &self.results
    }

    fn refresh(&mut self) {
        self.results = search(&self.catalog, &self.criteria);
    }
}
