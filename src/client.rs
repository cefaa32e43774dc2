//! Deezer catalog client.
//!
//! One HTTP request per search call. Transport failures never escape:
//! they are logged as warnings and surfaced as an empty candidate list,
//! so the query cascade falls through to the next strategy instead of
//! aborting the batch.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::{debug, warn};
use serde::Deserialize;

use crate::models::Candidate;

pub const DEEZER_API_BASE: &str = "https://api.deezer.com";

/// Deezer allows 50 requests per 5 seconds; one request every 150 ms
/// stays under that budget.
pub const MIN_REQUEST_DELAY: Duration = Duration::from_millis(150);

/// Default bound on search results considered per query.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

// ============================================================================
// Search Seam
// ============================================================================

/// Search interface the orchestrator drives; stubbed out in tests.
pub trait CatalogSearch {
    /// Run one search. Returns an empty list both for "no results" and
    /// for transport failures.
    fn search(&self, query: &str, limit: usize) -> Vec<Candidate>;
}

// ============================================================================
// Request Pacing
// ============================================================================

/// Token bucket shared by every catalog request in a batch.
///
/// One permit refills per period, so consecutive `acquire` calls are at
/// least one period apart. A parallelized runner can share one pacer
/// across workers without changing this contract.
pub struct RequestPacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RequestPacer {
    pub fn new(min_delay: Duration) -> Self {
        // A zero period is not a valid quota; treat it as "no pacing
        // beyond one millisecond".
        let period = min_delay.max(Duration::from_millis(1));
        Self {
            limiter: RateLimiter::direct(
                Quota::with_period(period)
                    .expect("non-zero pacing period")
                    .allow_burst(NonZeroU32::new(1).expect("non-zero pacing burst")),
            ),
        }
    }

    /// Block until the next request slot opens.
    pub fn acquire(&self) {
        while self.limiter.check().is_err() {
            thread::sleep(Duration::from_millis(10));
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<TrackPayload>,
}

#[derive(Debug, Deserialize)]
struct TrackPayload {
    id: u64,
    #[serde(default)]
    title: String,
    link: Option<String>,
    preview: Option<String>,
    duration: Option<u64>,
    artist: Option<ArtistPayload>,
    album: Option<AlbumPayload>,
}

#[derive(Debug, Deserialize)]
struct ArtistPayload {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumPayload {
    title: Option<String>,
}

impl From<TrackPayload> for Candidate {
    fn from(track: TrackPayload) -> Self {
        Candidate {
            remote_id: track.id,
            title: track.title,
            artist_name: track.artist.and_then(|a| a.name).unwrap_or_default(),
            album_title: track.album.and_then(|a| a.title),
            link: track.link,
            preview_url: track.preview,
            duration_sec: track.duration,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct DeezerClient {
    agent: ureq::Agent,
    base_url: String,
    pacer: RequestPacer,
}

impl DeezerClient {
    pub fn new(min_delay: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .timeout_read(Duration::from_secs(10))
            .timeout_write(Duration::from_secs(10))
            .build();
        Self {
            agent,
            base_url: DEEZER_API_BASE.to_string(),
            pacer: RequestPacer::new(min_delay),
        }
    }

    fn search_inner(&self, query: &str, limit: usize) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/search?q={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );
        debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .call()
            .map_err(|e| anyhow!("request failed: {e}"))?;
        let body = response
            .into_string()
            .context("failed to read response body")?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).context("invalid JSON response")?;
        Ok(parsed.data.into_iter().map(Candidate::from).collect())
    }
}

impl CatalogSearch for DeezerClient {
    fn search(&self, query: &str, limit: usize) -> Vec<Candidate> {
        self.pacer.acquire();
        match self.search_inner(query, limit) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("catalog search failed for {query:?}: {err:#}");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_parse_full_track_payload() {
        let body = r#"{
            "data": [{
                "id": 3135556,
                "title": "Yesterday",
                "link": "https://www.deezer.com/track/3135556",
                "preview": "https://cdn.deezer.com/preview.mp3",
                "duration": 125,
                "rank": 950000,
                "artist": { "id": 1, "name": "The Beatles" },
                "album": { "id": 2, "title": "Help!", "cover_medium": "https://cdn.deezer.com/cover.jpg" }
            }],
            "total": 1
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let candidates: Vec<Candidate> = parsed.data.into_iter().map(Candidate::from).collect();
        assert_eq!(candidates.len(), 1);

        let c = &candidates[0];
        assert_eq!(c.remote_id, 3135556);
        assert_eq!(c.title, "Yesterday");
        assert_eq!(c.artist_name, "The Beatles");
        assert_eq!(c.album_title.as_deref(), Some("Help!"));
        assert_eq!(c.link.as_deref(), Some("https://www.deezer.com/track/3135556"));
        assert_eq!(c.preview_url.as_deref(), Some("https://cdn.deezer.com/preview.mp3"));
        assert_eq!(c.duration_sec, Some(125));
    }

    #[test]
    fn test_parse_missing_nested_fields() {
        let body = r#"{"data": [{"id": 42, "title": "Orphan Track"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let c = Candidate::from(parsed.data.into_iter().next().unwrap());
        assert_eq!(c.remote_id, 42);
        assert_eq!(c.artist_name, "");
        assert!(c.album_title.is_none());
        assert!(c.duration_sec.is_none());
    }

    #[test]
    fn test_parse_missing_data_array() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(parsed.data.is_empty());
    }

    #[test]
    fn test_parse_malformed_body_is_an_error() {
        assert!(serde_json::from_str::<SearchResponse>("<html>502</html>").is_err());
        assert!(serde_json::from_str::<SearchResponse>(r#"{"data": "nope"}"#).is_err());
    }

    #[test]
    fn test_pacer_first_acquire_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(200));
        let start = Instant::now();
        pacer.acquire();
        assert!(
            start.elapsed() < Duration::from_millis(100),
            "first acquire should not wait, took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn test_pacer_spaces_subsequent_acquires() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let start = Instant::now();
        for _ in 0..3 {
            pacer.acquire();
        }
        // Three acquires must span at least two periods
        assert!(
            start.elapsed() >= Duration::from_millis(90),
            "three acquires finished too fast: {:?}",
            start.elapsed()
        );
    }
}
