//! String normalization for match comparisons.
//!
//! The matching contract is plain case-insensitive equality and
//! containment, so normalization stays minimal: lowercase and collapse
//! whitespace. Heavier cleanup (edition suffixes, transliteration)
//! belongs to the scanner upstream, not the matcher.

/// Normalize a title or artist name for comparison.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
