//! Sequential batch driver.
//!
//! Processes records one at a time in input order; each record finishes
//! all of its service calls before the next begins. Output length and
//! ordering always equal the input's.

use std::time::Instant;

use log::info;

use crate::client::CatalogSearch;
use crate::matcher::match_one;
use crate::models::{BatchStats, EnrichedRecord, MatchStatus, SourceRecord};
use crate::progress::{create_progress_bar, is_log_only};

/// Run the whole batch through the orchestrator.
pub fn run<C: CatalogSearch>(
    records: &[SourceRecord],
    client: &C,
    limit: usize,
) -> (Vec<EnrichedRecord>, BatchStats) {
    let start = Instant::now();
    let pb = create_progress_bar(records.len() as u64, "Matching");
    let mut stats = BatchStats::default();
    let mut enriched = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let result = match_one(record, client, limit);
        let outcome = match result.match_status {
            MatchStatus::Matched => "matched",
            MatchStatus::NoMatch => "no match",
            MatchStatus::Skipped => "skipped (unreadable)",
        };
        let line = format!(
            "[{}/{}] {} - {}: {}",
            index + 1,
            records.len(),
            record.artist,
            record.title,
            outcome
        );
        if is_log_only() {
            info!("{line}");
        } else {
            pb.println(line);
        }

        stats.record(result.match_status);
        enriched.push(result);
        pb.inc(1);
    }

    stats.elapsed_seconds = start.elapsed().as_secs_f64();
    pb.finish_with_message(format!("Matched {}/{} records", stats.matched, stats.total));
    (enriched, stats)
}

// ============================================================================
// Tests
// ============================================================================
