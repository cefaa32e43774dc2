//! Candidate scoring for catalog search results.
//!
//! Scoring is additive over independent signals per candidate; the
//! functions here are pure and never mutate the candidate list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Candidate;
use crate::normalize::normalize;

// ============================================================================
// Score Weights
// ============================================================================

/// Normalized candidate title equals the queried title.
pub const TITLE_EXACT: i32 = 100;

/// One title contains the other.
pub const TITLE_PARTIAL: i32 = 50;

/// Normalized candidate artist equals the queried artist.
pub const ARTIST_EXACT: i32 = 100;

/// One artist name contains the other.
pub const ARTIST_PARTIAL: i32 = 50;

/// Candidate title mentions neither live nor remix.
pub const STUDIO_BONUS: i32 = 10;

// ============================================================================
// Regex Patterns
// ============================================================================

/// Substring markers for non-studio versions. No word boundaries: the
/// check is a plain case-insensitive containment test.
static NON_STUDIO_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)live").unwrap(),
        Regex::new(r"(?i)remix").unwrap(),
    ]
});

pub fn is_studio_version(title: &str) -> bool {
    !NON_STUDIO_PATTERNS.iter().any(|p| p.is_match(title))
}

// ============================================================================
// Scoring
// ============================================================================

fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Additive score for one candidate against the queried title/artist.
/// `title_norm` and `artist_norm` are pre-normalized query strings.
pub fn score_candidate(candidate: &Candidate, title_norm: &str, artist_norm: &str) -> i32 {
    let mut score = 0;
    let cand_title = normalize(&candidate.title);
    let cand_artist = normalize(&candidate.artist_name);

    if cand_title == title_norm {
        score += TITLE_EXACT;
    } else if contains_either(&cand_title, title_norm) {
        score += TITLE_PARTIAL;
    }

    if cand_artist == artist_norm {
        score += ARTIST_EXACT;
    } else if contains_either(&cand_artist, artist_norm) {
        score += ARTIST_PARTIAL;
    }

    if is_studio_version(&cand_title) {
        score += STUDIO_BONUS;
    }

    score
}

/// Rank candidates and pick the winner.
///
/// The sort is stable and descending, so equal scores keep the catalog
/// service's own ordering and the first of the top group wins. `year`
/// is part of the contract but carries no weight yet.
///
/// Returns `None` only for an empty input slice.
pub fn score_and_pick<'a>(
    candidates: &'a [Candidate],
    title: &str,
    artist: &str,
    _year: Option<i32>,
) -> Option<&'a Candidate> {
    let title_norm = normalize(title);
    let artist_norm = normalize(artist);

    let mut scored: Vec<(i32, &Candidate)> = candidates
        .iter()
        .map(|c| (score_candidate(c, &title_norm, &artist_norm), c))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    // A non-empty input always yields a non-empty scored list; fall back
    // to the service's own top result if that invariant ever breaks.
    scored
        .first()
        .map(|(_, winner)| *winner)
        .or_else(|| candidates.first())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, title: &str, artist: &str) -> Candidate {
        Candidate {
            remote_id: id,
            title: title.to_string(),
            artist_name: artist.to_string(),
            album_title: None,
            link: None,
            preview_url: None,
            duration_sec: None,
        }
    }

    #[test]
    fn test_is_studio_version() {
        assert!(is_studio_version("yesterday"));
        assert!(!is_studio_version("yesterday (live)"));
        assert!(!is_studio_version("yesterday - club remix"));
        // Substring semantics, no word boundary
        assert!(!is_studio_version("alive"));
    }

    #[test]
    fn test_exact_match_beats_live_version() {
        let candidates = vec![
            candidate(1, "Yesterday", "The Beatles"),
            candidate(2, "Yesterday (Live)", "The Beatles"),
        ];

        let studio = score_candidate(&candidates[0], "yesterday", "the beatles");
        let live = score_candidate(&candidates[1], "yesterday", "the beatles");
        assert_eq!(studio, TITLE_EXACT + ARTIST_EXACT + STUDIO_BONUS); // 210
        assert_eq!(live, TITLE_PARTIAL + ARTIST_EXACT); // 150

        let winner = score_and_pick(&candidates, "Yesterday", "The Beatles", None).unwrap();
        assert_eq!(winner.remote_id, 1);
    }

    #[test]
    fn test_exact_match_wins_regardless_of_order() {
        let candidates = vec![
            candidate(2, "Yesterday (Live)", "The Beatles"),
            candidate(1, "Yesterday", "The Beatles"),
        ];
        let winner = score_and_pick(&candidates, "Yesterday", "The Beatles", None).unwrap();
        assert_eq!(winner.remote_id, 1);
    }

    #[test]
    fn test_partial_title_match() {
        let c = candidate(1, "Yesterday - Remastered 2009", "The Beatles");
        // One title contains the other, artist is exact, remaster is
        // still a studio version
        assert_eq!(
            score_candidate(&c, "yesterday", "the beatles"),
            TITLE_PARTIAL + ARTIST_EXACT + STUDIO_BONUS
        );
    }

    #[test]
    fn test_partial_artist_match() {
        let c = candidate(1, "Under Pressure", "Queen & David Bowie");
        assert_eq!(
            score_candidate(&c, "under pressure", "queen"),
            TITLE_EXACT + ARTIST_PARTIAL + STUDIO_BONUS
        );
    }

    #[test]
    fn test_comparisons_are_case_insensitive() {
        let c = candidate(1, "YESTERDAY", "the beatles");
        assert_eq!(
            score_candidate(&c, "yesterday", "the beatles"),
            TITLE_EXACT + ARTIST_EXACT + STUDIO_BONUS
        );
    }

    #[test]
    fn test_tie_keeps_service_order() {
        // Identical metadata scores identically; the stable sort keeps
        // the catalog's own ranking, so the first candidate wins.
        let candidates = vec![
            candidate(10, "Hey Jude", "The Beatles"),
            candidate(20, "Hey Jude", "The Beatles"),
        ];
        let winner = score_and_pick(&candidates, "Hey Jude", "The Beatles", None).unwrap();
        assert_eq!(winner.remote_id, 10);
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let candidates = vec![
            candidate(1, "Help", "The Beatles"),
            candidate(2, "Help!", "The Beatles"),
            candidate(3, "Help! (Live)", "Beatles Tribute Band"),
        ];
        let first = score_and_pick(&candidates, "Help!", "The Beatles", Some(1965))
            .unwrap()
            .remote_id;
        for _ in 0..10 {
            let again = score_and_pick(&candidates, "Help!", "The Beatles", Some(1965))
                .unwrap()
                .remote_id;
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_year_does_not_affect_ranking() {
        let candidates = vec![
            candidate(1, "Yesterday", "The Beatles"),
            candidate(2, "Yesterday (Live)", "The Beatles"),
        ];
        let without = score_and_pick(&candidates, "Yesterday", "The Beatles", None).unwrap();
        let with = score_and_pick(&candidates, "Yesterday", "The Beatles", Some(1965)).unwrap();
        assert_eq!(without.remote_id, with.remote_id);
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(score_and_pick(&[], "Yesterday", "The Beatles", None).is_none());
    }
}
