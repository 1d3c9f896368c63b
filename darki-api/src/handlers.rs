//! API route handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::dto::*;
use crate::error::ApiError;
use crate::search::SearchOutcome;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Marks the server start for the uptime counter.
pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
        debrid_enabled: state.search.resolver().has_debrid(),
        searches_in_flight: state.search.in_flight(),
    })
}

/// GET /search
///
/// `name` (or `query`) is required; `type` defaults to `movie`; `series`
/// and `animes` also need `season`. Answers 429 while the same search is
/// already running.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let query = params.into_query()?;

    match state.search.search(&query).await? {
        SearchOutcome::Cached(response) | SearchOutcome::Fresh(response) => Ok(Json(response)),
        SearchOutcome::Rejected => {
            info!(query = %query.query, "Duplicate search rejected");
            Err(ApiError::too_many_requests(
                "Search already in progress for this query",
            ))
        }
    }
}

/// GET /api/v1/cache/stats
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        search: state.search.cache_stats(),
        links: state.search.resolver().cache_stats(),
        searches_in_flight: state.search.in_flight(),
    })
}

/// POST /api/v1/cache/clear
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    let response = ClearCacheResponse {
        search_cleared: state.search.clear_cache(),
        links_cleared: state.search.resolver().clear_cache(),
    };

    info!(
        search = response.search_cleared,
        links = response.links_cleared,
        "Caches cleared on request"
    );
    Json(response)
}
