//! Greedy subsequence matching.

/// Fraction of search characters that must be found, in order, for a
/// fuzzy match to succeed.
pub const FUZZY_THRESHOLD: f64 = 0.6;

/// Fraction of `search` characters found in order while scanning `text`
/// once. Both sides are compared lowercased; an empty search scores 1.0.
pub fn match_ratio(text: &str, search: &str) -> f64 {
    let search: Vec<char> = search.to_lowercase().chars().collect();
    if search.is_empty() {
        return 1.0;
    }

    let mut matched = 0;
    for c in text.to_lowercase().chars() {
        if matched < search.len() && c == search[matched] {
            matched += 1;
        }
    }
    matched as f64 / search.len() as f64
}

/// Whether `search` fuzzily matches `text`.
pub fn fuzzy_match(text: &str, search: &str) -> bool {
    match_ratio(text, search) >= FUZZY_THRESHOLD
}
