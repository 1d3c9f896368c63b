//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use darki_cache::CacheStats;
use darki_core::error::{DarkiError, Result};
use darki_core::types::{MediaType, Release, SearchQuery};

// ═══════════════════════════════════════════════════════════════════════════
// Search
// ═══════════════════════════════════════════════════════════════════════════

/// Query string of `GET /search`.
///
/// Everything arrives as text so malformed numbers produce our own 400
/// instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search text
    pub name: Option<String>,
    /// Alias of `name`
    pub query: Option<String>,
    /// `movie` (default), `series` or `animes`
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Season number
    pub season: Option<String>,
    /// Episode number
    pub ep: Option<String>,
}

impl SearchParams {
    /// Parses the parameters into a query. Does not check season rules;
    /// see [`SearchQuery::validate`].
    pub fn into_query(self) -> Result<SearchQuery> {
        let text = [self.name, self.query]
            .into_iter()
            .flatten()
            .find(|q| !q.trim().is_empty())
            .ok_or_else(|| DarkiError::MissingParameter("name".into()))?;

        let media_type: MediaType = self.media_type.as_deref().unwrap_or_default().parse()?;

        let mut query = SearchQuery::new(text.trim(), media_type);
        if let Some(season) = parse_number("season", self.season)? {
            query = query.with_season(season);
        }
        if let Some(episode) = parse_number("ep", self.ep)? {
            query = query.with_episode(episode);
        }
        Ok(query)
    }
}

fn parse_number(name: &str, raw: Option<String>) -> Result<Option<u32>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| DarkiError::InvalidParameter {
                name: name.to_string(),
                value: value.to_string(),
            }),
    }
}

/// Body of a successful `GET /search`. This is also what the search cache
/// stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// Always true; failures use the error body
    pub success: bool,
    /// Normalized query text sent to the source
    pub query: String,
    /// Media type searched
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Season, if any
    pub season: Option<u32>,
    /// Episode, if any
    pub ep: Option<u32>,
    /// Candidates returned by the source, before any filtering
    pub total_candidates: usize,
    /// Releases whose links are alive
    pub releases: Vec<Release>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Health & cache admin
// ═══════════════════════════════════════════════════════════════════════════

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Whether link checks go through the debrid API
    pub debrid_enabled: bool,
    /// Searches currently in flight
    pub searches_in_flight: usize,
}

/// Response for cache statistics.
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// Search response cache
    pub search: CacheStats,
    /// Link verdict cache, absent when disabled
    pub links: Option<CacheStats>,
    /// Searches currently in flight
    pub searches_in_flight: usize,
}

/// Response for cache clearing.
#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    /// Search responses dropped
    pub search_cleared: usize,
    /// Link verdicts dropped
    pub links_cleared: usize,
}
