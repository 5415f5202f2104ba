//! "Did you mean" suggestions.

use crate::catalog::Product;
use crate::search::fuzzy::fuzzy_match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchStrength {
    Prefix,
    Contains,
    Fuzzy,
}

fn strength(candidate: &str, query: &str) -> Option<MatchStrength> {
    let lowered = candidate.to_lowercase();
    if lowered.starts_with(query) {
        Some(MatchStrength::Prefix)
    } else if lowered.contains(query) {
        Some(MatchStrength::Contains)
    } else if fuzzy_match(&lowered, query) {
        Some(MatchStrength::Fuzzy)
    } else {
        None
    }
}

/// Best product name or category for `query`, scanning the whole catalog.
///
/// A prefix match beats a substring match, which beats a fuzzy match;
/// ties go to the earliest candidate. Returns `None` for a blank query or
/// when the best candidate equals the query ignoring case.
pub fn suggest(catalog: &[Product], query: &str) -> Option<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(MatchStrength, &str)> = None;
    for candidate in catalog
        .iter()
        .flat_map(|p| [p.name.as_str(), p.category.as_str()])
    {
        let Some(s) = strength(candidate, &query) else {
            continue;
        };
        if best.map(|(current, _)| s < current).unwrap_or(true) {
            best = Some((s, candidate));
            if s == MatchStrength::Prefix {
                break;
            }
        }
    }

    best.map(|(_, candidate)| candidate)
        .filter(|candidate| candidate.to_lowercase() != query)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("1", "Linen Shirt", Money::usd(3999), "Shirts"),
            Product::new("2", "Floral Dress", Money::usd(5999), "Dresses"),
            Product::new("3", "Denim Jacket", Money::usd(7999), "Outerwear"),
        ]
    }

    #[test]
    fn test_prefix_beats_contains() {
        // "Floral Dress" contains "dress" but category "Dresses" starts with it
        assert_eq!(suggest(&catalog(), "dress").as_deref(), Some("Dresses"));
    }

    #[test]
    fn test_contains_beats_fuzzy() {
        assert_eq!(suggest(&catalog(), "jacket").as_deref(), Some("Denim Jacket"));
    }

    #[test]
    fn test_fuzzy_recovers_typo() {
        assert_eq!(suggest(&catalog(), "denm").as_deref(), Some("Denim Jacket"));
    }

    #[test]
    fn test_same_as_query_is_not_offered() {
        assert_eq!(suggest(&catalog(), "Shirts"), None);
    }

    #[test]
    fn test_blank_or_hopeless() {
        assert_eq!(suggest(&catalog(), "  "), None);
        assert_eq!(suggest(&catalog(), "zzzz"), None);
        assert_eq!(suggest(&[], "dress"), None);
    }
}
