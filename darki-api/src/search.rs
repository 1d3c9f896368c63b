//! Search orchestration: cache, duplicate guard, source, link checks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use darki_cache::{CacheStats, RequestGuard, TtlCache};
use darki_core::error::Result;
use darki_core::traits::ReleaseSource;
use darki_core::types::{Release, ReleaseId, SearchQuery};
use darki_debrid::LinkResolver;

use crate::dto::SearchResponse;

/// What a search call produced.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Served from the search cache
    Cached(SearchResponse),
    /// Computed by this call
    Fresh(SearchResponse),
    /// The same search is already running; retry later
    Rejected,
}

/// Owns the search cache and guard and runs the search pipeline.
pub struct SearchService {
    source: Arc<dyn ReleaseSource>,
    resolver: LinkResolver,
    cache: TtlCache<String, SearchResponse>,
    guard: RequestGuard,
    allowed_hosters: Vec<String>,
}

impl SearchService {
    /// Creates a service with an empty cache.
    pub fn new(
        source: Arc<dyn ReleaseSource>,
        resolver: LinkResolver,
        cache_ttl: Duration,
        allowed_hosters: Vec<String>,
    ) -> Self {
        Self {
            source,
            resolver,
            cache: TtlCache::new("SearchCache", cache_ttl),
            guard: RequestGuard::new("SearchGuard"),
            allowed_hosters,
        }
    }

    /// Runs a search.
    ///
    /// Order: validate, cache lookup, guard, source, hoster filter, link
    /// checks. Only successful responses are cached. The guard key is
    /// released on every exit path, including errors and cancellation.
    #[instrument(skip(self, query), fields(query = %query.query, media_type = %query.media_type))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        query.validate()?;

        let key = query.cache_key();
        if let Some(hit) = self.cache.get(&key) {
            info!(key = %key, "Cache hit");
            return Ok(SearchOutcome::Cached(hit));
        }

        let Some(_permit) = self.guard.try_acquire(&key) else {
            return Ok(SearchOutcome::Rejected);
        };

        let response = self.run(query).await?;
        self.cache.set(key, response.clone());
        info!(
            releases = response.releases.len(),
            candidates = response.total_candidates,
            "Cached search result"
        );

        Ok(SearchOutcome::Fresh(response))
    }

    async fn run(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let candidates = self.source.fetch_candidates(query).await?;
        let total_candidates = candidates.len();

        let candidates: Vec<_> = candidates
            .into_iter()
            .filter(|c| c.is_hoster_allowed(&self.allowed_hosters))
            .collect();
        if candidates.len() < total_candidates {
            info!(
                kept = candidates.len(),
                dropped = total_candidates - candidates.len(),
                "Filtered candidates by hoster"
            );
        }

        let links: HashMap<ReleaseId, String> = candidates
            .iter()
            .map(|c| (c.id.clone(), c.link.clone()))
            .collect();
        let resolution = self.resolver.resolve_links(&links).await;

        let releases: Vec<Release> = candidates
            .into_iter()
            .filter(|c| resolution.is_available(&c.id))
            .map(|c| {
                let exact = resolution.filename_for(&c.link).map(str::to_string);
                Release::from_candidate(c, exact.as_deref())
            })
            .collect();

        Ok(SearchResponse {
            success: true,
            query: query.normalized_query(),
            media_type: query.media_type,
            season: query.season,
            ep: query.episode,
            total_candidates,
            releases,
        })
    }

    /// The link resolver.
    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }

    /// Number of searches currently running.
    pub fn in_flight(&self) -> usize {
        self.guard.active_count()
    }

    /// The in-flight guard.
    pub fn guard(&self) -> &RequestGuard {
        &self.guard
    }

    /// Search cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached search response.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear_all()
    }

    /// Drops expired entries from both caches. Returns (search, links).
    pub fn sweep_expired(&self) -> (usize, usize) {
        (self.cache.clear_expired(), self.resolver.clear_expired_cache())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{batch_resolver, candidates, DeadProber, StaticSource};
    use async_trait::async_trait;
    use darki_core::types::{MediaType, ReleaseCandidate};
    use darki_debrid::ResolverConfig;
    use tokio::sync::Notify;

    fn service(source: Arc<StaticSource>, hosters: &[&str]) -> SearchService {
        SearchService::new(
            source,
            batch_resolver(),
            Duration::from_secs(60),
            hosters.iter().map(|h| h.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_search_builds_releases() {
        let source = StaticSource::new(candidates());
        let service = service(source.clone(), &["1fichier"]);

        let outcome = service
            .search(&SearchQuery::new("Avatar", MediaType::Movie))
            .await
            .unwrap();

        let SearchOutcome::Fresh(response) = outcome else {
            panic!("expected a fresh result");
        };
        assert_eq!(response.total_candidates, 3);
        assert_eq!(response.releases.len(), 2);
        assert_eq!(response.releases[0].name, "Avatar.2009.MULTi.1080p");
        assert!(response.releases[0].exact_name);
        assert_eq!(response.releases[1].name, "Avatar 720p FRENCH");
        assert!(!response.releases[1].exact_name);
    }

    #[tokio::test]
    async fn test_second_search_hits_cache() {
        let source = StaticSource::new(candidates());
        let service = service(source.clone(), &[]);
        let query = SearchQuery::new("Avatar", MediaType::Movie);

        let first = service.search(&query).await.unwrap();
        let second = service
            .search(&SearchQuery::new("  AVATAR ", MediaType::Movie))
            .await
            .unwrap();

        assert!(matches!(first, SearchOutcome::Fresh(_)));
        assert!(matches!(second, SearchOutcome::Cached(ref r) if r.releases.len() == 3));
        assert_eq!(source.calls(), 1);
        assert_eq!(service.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_in_flight_is_rejected() {
        let source = StaticSource::new(candidates());
        let service = service(source.clone(), &[]);
        let query = SearchQuery::new("Avatar", MediaType::Movie);

        let _held = service.guard().try_acquire(&query.cache_key()).unwrap();
        let outcome = service.search(&query).await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Rejected));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached_and_releases_key() {
        let source = StaticSource::failing();
        let service = service(source.clone(), &[]);
        let query = SearchQuery::new("Avatar", MediaType::Movie);

        assert!(service.search(&query).await.is_err());
        assert!(service.search(&query).await.is_err());

        assert_eq!(source.calls(), 2);
        assert_eq!(service.cache_stats().total_entries, 0);
        assert!(!service.guard().is_locked(&query.cache_key()));
    }

    #[tokio::test]
    async fn test_invalid_query_touches_nothing() {
        let source = StaticSource::new(candidates());
        let service = service(source.clone(), &[]);

        let err = service
            .search(&SearchQuery::new("Dark", MediaType::Series))
            .await
            .unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(source.calls(), 0);
    }

    struct BlockingSource {
        started: Notify,
        proceed: Notify,
    }

    #[async_trait]
    impl ReleaseSource for BlockingSource {
        async fn fetch_candidates(&self, _query: &SearchQuery) -> Result<Vec<ReleaseCandidate>> {
            self.started.notify_one();
            self.proceed.notified().await;
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "blocking"
        }
    }

    #[tokio::test]
    async fn test_cancelled_search_releases_key() {
        let source = Arc::new(BlockingSource {
            started: Notify::new(),
            proceed: Notify::new(),
        });
        let service = Arc::new(SearchService::new(
            source.clone(),
            LinkResolver::new(ResolverConfig::default().no_cache(), None, Arc::new(DeadProber)),
            Duration::from_secs(60),
            Vec::new(),
        ));
        let query = SearchQuery::new("Avatar", MediaType::Movie);

        let task = {
            let service = service.clone();
            let query = query.clone();
            tokio::spawn(async move { service.search(&query).await.map(|_| ()) })
        };

        source.started.notified().await;
        assert!(service.guard().is_locked(&query.cache_key()));

        task.abort();
        let _ = task.await;

        assert!(!service.guard().is_locked(&query.cache_key()));
    }
}
