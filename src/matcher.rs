//! Per-record match orchestration.
//!
//! Drives the query cascade through the catalog client and merges the
//! scorer's pick into the output record. Each record ends in exactly one
//! of three terminal states: skipped, no match, or matched.

use log::debug;

use crate::client::CatalogSearch;
use crate::models::{EnrichedRecord, MatchStatus, RecordStatus, SourceRecord};
use crate::query::build_queries;
use crate::scoring::score_and_pick;

/// Match one record against the catalog.
///
/// Unreadable records are passed through without any service call.
/// Otherwise the query cascade runs until a strategy returns candidates;
/// the scorer picks the winner from that list and weaker strategies are
/// not consulted, even when the list scores poorly.
pub fn match_one<C: CatalogSearch>(
    record: &SourceRecord,
    client: &C,
    limit: usize,
) -> EnrichedRecord {
    if record.status == RecordStatus::Unreadable {
        return EnrichedRecord::unmatched(record, MatchStatus::Skipped);
    }

    for query in build_queries(&record.title, &record.artist) {
        let candidates = client.search(&query, limit);
        if candidates.is_empty() {
            continue;
        }
        debug!(
            "record {}: {} candidate(s) for {:?}",
            record.id,
            candidates.len(),
            query
        );
        return match score_and_pick(&candidates, &record.title, &record.artist, record.year) {
            Some(winner) => EnrichedRecord::matched(record, winner),
            None => EnrichedRecord::unmatched(record, MatchStatus::NoMatch),
        };
    }

    EnrichedRecord::unmatched(record, MatchStatus::NoMatch)
}

// ============================================================================
// Tests
// ============================================================================
