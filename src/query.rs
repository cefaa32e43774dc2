//! Search-query construction.
//!
//! Three strategies in a fixed order, most specific first. The
//! orchestrator walks the cascade and stops at the first strategy whose
//! result list is non-empty.

/// Build the query cascade for one record.
///
/// 1. Field-scoped search with artist and track filters, both quoted -
///    highest precision, lowest recall.
/// 2. Artist and title as free text - tolerates catalog entries with
///    slightly different field tagging.
/// 3. Title only - last resort for covers and mis-tagged compilations.
pub fn build_queries(title: &str, artist: &str) -> Vec<String> {
    vec![
        format!("artist:\"{artist}\" track:\"{title}\""),
        format!("{artist} {title}"),
        title.to_string(),
    ]
}
