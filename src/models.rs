//! Core data models for Deezer card matching.
//!
//! This module contains the struct definitions and enums used throughout
//! the matching pipeline.

use serde::{Deserialize, Serialize};

/// Sentinel value the upstream card scanner writes into `title` or
/// `artist` when a card could not be read.
pub const UNREADABLE_SENTINEL: &str = "UNLESBAR";

// ============================================================================
// Input Models
// ============================================================================

/// Readability of a source record, detected once at load time so the
/// engine never has to compare against the sentinel string itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordStatus {
    #[default]
    Readable,
    /// Title or artist carried the unreadable sentinel; the record is
    /// passed through without any catalog lookup.
    Unreadable,
}

impl RecordStatus {
    pub fn detect(title: &str, artist: &str) -> Self {
        if title == UNREADABLE_SENTINEL || artist == UNREADABLE_SENTINEL {
            RecordStatus::Unreadable
        } else {
            RecordStatus::Readable
        }
    }
}

/// One card entry from the input JSON.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceRecord {
    pub id: i64,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub year: Option<i32>,
    /// Set in `output::load_records`; not part of the input JSON.
    #[serde(skip)]
    pub status: RecordStatus,
}

// ============================================================================
// Catalog Models
// ============================================================================

/// Raw track from the catalog search service. Exists only while one
/// record is being scored.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub remote_id: u64,
    pub title: String,
    pub artist_name: String,
    pub album_title: Option<String>,
    pub link: Option<String>,
    pub preview_url: Option<String>,
    pub duration_sec: Option<u64>,
}

// ============================================================================
// Output Models
// ============================================================================

/// Terminal state of one record after matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    NoMatch,
    Skipped,
}

/// Final output row: the source fields plus the winning candidate's
/// fields flattened in.
///
/// Enrichment fields are always present in the serialized form - `null`
/// when the record was skipped or found no match - so downstream
/// consumers can tell "processed, no match" from "not processed at all".
#[derive(Clone, Debug, Serialize)]
pub struct EnrichedRecord {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub match_status: MatchStatus,
    pub deezer_id: Option<u64>,
    pub deezer_title: Option<String>,
    pub deezer_artist: Option<String>,
    pub deezer_album: Option<String>,
    pub deezer_link: Option<String>,
    pub deezer_preview: Option<String>,
    pub duration_sec: Option<u64>,
}

impl EnrichedRecord {
    /// Record passed through without enrichment (skipped or no match).
    pub fn unmatched(record: &SourceRecord, status: MatchStatus) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            artist: record.artist.clone(),
            year: record.year,
            match_status: status,
            deezer_id: None,
            deezer_title: None,
            deezer_artist: None,
            deezer_album: None,
            deezer_link: None,
            deezer_preview: None,
            duration_sec: None,
        }
    }

    /// Record with the winning candidate's fields flattened in.
    pub fn matched(record: &SourceRecord, winner: &Candidate) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            artist: record.artist.clone(),
            year: record.year,
            match_status: MatchStatus::Matched,
            deezer_id: Some(winner.remote_id),
            deezer_title: Some(winner.title.clone()),
            deezer_artist: Some(winner.artist_name.clone()),
            deezer_album: winner.album_title.clone(),
            deezer_link: winner.link.clone(),
            deezer_preview: winner.preview_url.clone(),
            duration_sec: winner.duration_sec,
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Per-batch outcome counts for the final summary.
#[derive(Default, Debug, Clone, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub matched: usize,
    pub no_match: usize,
    pub skipped: usize,
    pub elapsed_seconds: f64,
}

impl BatchStats {
    pub fn record(&mut self, status: MatchStatus) {
        self.total += 1;
        match status {
            MatchStatus::Matched => self.matched += 1,
            MatchStatus::NoMatch => self.no_match += 1,
            MatchStatus::Skipped => self.skipped += 1,
        }
    }

    /// Match rate as a percentage of the whole batch.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.matched as f64 / self.total as f64
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
