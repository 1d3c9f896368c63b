//! Link availability resolution.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use darki_cache::{CacheStats, TtlCache};
use darki_core::constants::{DEFAULT_PROBE_CONCURRENCY, LINK_CACHE_TTL_SECS};
use darki_core::ReleaseId;

use crate::alldebrid::{AllDebridClient, DebridConfig};
use crate::probe::HttpProber;
use crate::transport::{DebridApi, LinkInfo, LinkProber, ProbeMethod};

/// Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Debrid API key. `None` or empty skips the batch call entirely.
    pub api_key: Option<String>,
    /// Debrid API base URL override
    pub debrid_base_url: Option<String>,
    /// Maximum number of fallback probes in flight
    pub probe_concurrency: usize,
    /// Whether link verdicts are cached
    pub enable_cache: bool,
    /// Verdict cache TTL in seconds
    pub cache_ttl_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            debrid_base_url: None,
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
            enable_cache: true,
            cache_ttl_seconds: LINK_CACHE_TTL_SECS,
        }
    }
}

impl ResolverConfig {
    /// Creates a config with a debrid API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Overrides the debrid API base URL.
    pub fn with_debrid_base_url(mut self, url: impl Into<String>) -> Self {
        self.debrid_base_url = Some(url.into());
        self
    }

    /// Sets the fallback probe concurrency (at least 1).
    pub fn with_probe_concurrency(mut self, limit: usize) -> Self {
        self.probe_concurrency = limit.max(1);
        self
    }

    /// Disables the verdict cache.
    pub fn no_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }

    /// Sets the verdict cache TTL.
    pub fn cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl_seconds = seconds;
        self
    }

    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Why the per-link fallback ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// No debrid API key is configured
    NoCredential,
    /// The batch call failed; carries the error text
    BatchFailed(String),
}

/// Which path produced the verdicts of a resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResolutionPath {
    /// Nothing needed checking: empty input, or every link was cached
    #[default]
    NotNeeded,
    /// One batch debrid call
    Batch,
    /// Individual HTTP probes
    Fallback(FallbackReason),
}

impl ResolutionPath {
    /// True when the per-link fallback was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolutionPath::Fallback(_))
    }
}

/// Result of [`LinkResolver::resolve_links`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkResolution {
    /// Release ID to link, for every release whose link is alive
    pub available: HashMap<ReleaseId, String>,
    /// Link to filename without extension. Only the batch path fills this.
    pub filenames: HashMap<String, String>,
    /// How uncached links were checked
    pub path: ResolutionPath,
    /// Number of distinct links answered from the verdict cache
    pub from_cache: usize,
}

impl LinkResolution {
    /// True if the release's link is alive.
    pub fn is_available(&self, id: &str) -> bool {
        self.available.contains_key(id)
    }

    /// Exact filename for an alive link, if the batch call reported one.
    pub fn filename_for(&self, link: &str) -> Option<&str> {
        self.filenames.get(link).map(String::as_str)
    }
}

/// Per-link outcome of one check.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Verdict {
    Alive { filename: Option<String> },
    Dead,
    /// Not confirmed either way (timeouts, unexpected debrid errors,
    /// links the batch did not report). Excluded and never cached.
    Unconfirmed,
}

impl Verdict {
    fn is_definitive(&self) -> bool {
        !matches!(self, Verdict::Unconfirmed)
    }
}

/// Decides which candidate links are alive.
pub struct LinkResolver {
    config: ResolverConfig,
    debrid: Option<Arc<dyn DebridApi>>,
    prober: Arc<dyn LinkProber>,
    cache: Option<TtlCache<String, Verdict>>,
}

impl LinkResolver {
    /// Creates a resolver with explicit transports.
    ///
    /// `debrid` is `None` when no API key is configured.
    pub fn new(
        config: ResolverConfig,
        debrid: Option<Arc<dyn DebridApi>>,
        prober: Arc<dyn LinkProber>,
    ) -> Self {
        let cache = config.enable_cache.then(|| {
            TtlCache::new("LinkCache", Duration::from_secs(config.cache_ttl_seconds))
        });

        Self {
            config,
            debrid,
            prober,
            cache,
        }
    }

    /// Creates a resolver backed by AllDebrid and real HTTP probes.
    pub fn from_config(config: ResolverConfig) -> Self {
        let debrid = config.credential().map(|key| {
            let mut debrid_config = DebridConfig::new(key);
            if let Some(url) = &config.debrid_base_url {
                debrid_config = debrid_config.with_base_url(url.clone());
            }
            Arc::new(AllDebridClient::new(debrid_config)) as Arc<dyn DebridApi>
        });

        Self::new(config, debrid, Arc::new(HttpProber::new()))
    }

    /// True if a debrid credential is configured.
    pub fn has_debrid(&self) -> bool {
        self.debrid.is_some()
    }

    /// Resolves which of the given links are alive.
    ///
    /// Never fails. Every ID in the returned `available` map comes from
    /// `links` with its original URL, and every key of `filenames` is one of
    /// those URLs.
    #[instrument(skip(self, links), fields(links = links.len()))]
    pub async fn resolve_links(&self, links: &HashMap<ReleaseId, String>) -> LinkResolution {
        let mut resolution = LinkResolution::default();
        if links.is_empty() {
            return resolution;
        }

        let unique: BTreeSet<&str> = links
            .values()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect();

        let mut verdicts: HashMap<String, Verdict> = HashMap::with_capacity(unique.len());
        let mut pending = Vec::new();
        for link in unique {
            match self.cached_verdict(link) {
                Some(verdict) => {
                    verdicts.insert(link.to_string(), verdict);
                }
                None => pending.push(link.to_string()),
            }
        }
        resolution.from_cache = verdicts.len();

        if !pending.is_empty() {
            let (path, fresh) = self.check_uncached(&pending).await;
            resolution.path = path;

            for (link, verdict) in fresh {
                if let Some(cache) = &self.cache {
                    if verdict.is_definitive() {
                        cache.set(link.clone(), verdict.clone());
                    }
                }
                verdicts.insert(link, verdict);
            }
        }

        for (id, link) in links {
            if let Some(Verdict::Alive { filename }) = verdicts.get(link) {
                resolution.available.insert(id.clone(), link.clone());
                if let Some(name) = filename {
                    resolution.filenames.insert(link.clone(), name.clone());
                }
            }
        }

        info!(
            available = resolution.available.len(),
            total = links.len(),
            cached = resolution.from_cache,
            path = ?resolution.path,
            "Resolved link availability"
        );
        resolution
    }

    fn cached_verdict(&self, link: &str) -> Option<Verdict> {
        self.cache.as_ref().and_then(|c| c.get(link))
    }

    async fn check_uncached(&self, pending: &[String]) -> (ResolutionPath, HashMap<String, Verdict>) {
        let reason = match &self.debrid {
            None => {
                debug!("No debrid credential, probing links individually");
                FallbackReason::NoCredential
            }
            Some(debrid) => match debrid.link_infos(pending).await {
                Ok(infos) => return (ResolutionPath::Batch, classify_batch(pending, infos)),
                Err(e) => {
                    warn!(error = %e, "Debrid batch check failed, falling back to individual checks");
                    FallbackReason::BatchFailed(e.to_string())
                }
            },
        };

        (ResolutionPath::Fallback(reason), self.probe_all(pending).await)
    }

    async fn probe_all(&self, pending: &[String]) -> HashMap<String, Verdict> {
        stream::iter(pending.iter().cloned())
            .map(|link| async move {
                let verdict = self.probe_link(&link).await;
                (link, verdict)
            })
            .buffer_unordered(self.config.probe_concurrency.max(1))
            .collect()
            .await
    }

    async fn probe_link(&self, link: &str) -> Verdict {
        let status = match self.prober.probe(link, ProbeMethod::Head).await {
            Ok(405) => {
                debug!(link, "HEAD not allowed, retrying with ranged GET");
                self.prober.probe(link, ProbeMethod::RangedGet).await
            }
            other => other,
        };

        match status {
            Ok(404) => {
                warn!(link, "Link is dead (404)");
                Verdict::Dead
            }
            // Server errors and throttling say nothing lasting about the link
            Ok(code) if code == 429 || code >= 500 => {
                warn!(link, status = code, "Link check inconclusive");
                Verdict::Unconfirmed
            }
            Ok(code) if code >= 400 => {
                warn!(link, status = code, "Link check failed");
                Verdict::Dead
            }
            Ok(code) => {
                debug!(link, status = code, "Link is alive");
                Verdict::Alive { filename: None }
            }
            Err(e) => {
                warn!(link, error = %e, "Link check errored");
                Verdict::Unconfirmed
            }
        }
    }

    /// Drops every cached verdict. Returns how many were dropped.
    pub fn clear_cache(&self) -> usize {
        self.cache.as_ref().map_or(0, TtlCache::clear_all)
    }

    /// Drops expired verdicts. Returns how many were dropped.
    pub fn clear_expired_cache(&self) -> usize {
        self.cache.as_ref().map_or(0, TtlCache::clear_expired)
    }

    /// Verdict cache statistics, if caching is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(TtlCache::stats)
    }
}

fn classify_batch(requested: &[String], infos: Vec<LinkInfo>) -> HashMap<String, Verdict> {
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let mut verdicts = HashMap::with_capacity(infos.len());

    for info in infos {
        let Some(link) = info.link.clone() else {
            continue;
        };
        if !requested.contains(link.as_str()) {
            debug!(link = %link, "Ignoring link we did not ask about");
            continue;
        }

        let verdict = match info.error() {
            Some(error) if error.is_link_down() => {
                debug!(link = %link, "Link is down");
                Verdict::Dead
            }
            Some(error) => {
                warn!(link = %link, code = %error.code, message = %error.message, "Debrid could not check link");
                Verdict::Unconfirmed
            }
            None => Verdict::Alive {
                filename: info
                    .filename
                    .as_deref()
                    .map(strip_extension)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            },
        };
        verdicts.insert(link, verdict);
    }

    verdicts
}

/// Removes the final `.ext` from a filename; names without a dot are kept.
fn strip_extension(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(stem, _)| stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use darki_core::error::{DarkiError, Result};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ═══════════════════════════════════════════════════════════════════════════
    // FAKES
    // ═══════════════════════════════════════════════════════════════════════════

    struct FakeDebrid {
        infos: Option<Vec<LinkInfo>>,
        fail_first: usize,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl FakeDebrid {
        fn answering(infos: Vec<LinkInfo>) -> Arc<Self> {
            Arc::new(Self {
                infos: Some(infos),
                fail_first: 0,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                infos: None,
                fail_first: 0,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            })
        }

        /// Times out on the first `failures` calls, then answers `infos`.
        fn recovering(failures: usize, infos: Vec<LinkInfo>) -> Arc<Self> {
            Arc::new(Self {
                infos: Some(infos),
                fail_first: failures,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DebridApi for FakeDebrid {
        async fn link_infos(&self, links: &[String]) -> Result<Vec<LinkInfo>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().extend(links.iter().cloned());
            if call < self.fail_first {
                return Err(DarkiError::ConnectionTimeout("debrid".into()));
            }
            self.infos
                .clone()
                .ok_or_else(|| DarkiError::ConnectionTimeout("debrid".into()))
        }
    }

    #[derive(Default)]
    struct FakeProber {
        statuses: HashMap<(String, ProbeMethod), u16>,
        calls: Mutex<Vec<(String, ProbeMethod)>>,
    }

    impl FakeProber {
        fn with(mut self, link: &str, method: ProbeMethod, status: u16) -> Self {
            self.statuses.insert((link.to_string(), method), status);
            self
        }

        fn calls(&self) -> Vec<(String, ProbeMethod)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl LinkProber for FakeProber {
        async fn probe(&self, link: &str, method: ProbeMethod) -> Result<u16> {
            self.calls.lock().push((link.to_string(), method));
            self.statuses
                .get(&(link.to_string(), method))
                .copied()
                .ok_or_else(|| DarkiError::ConnectionTimeout(link.to_string()))
        }
    }

    fn links(pairs: &[(&str, &str)]) -> HashMap<ReleaseId, String> {
        pairs
            .iter()
            .map(|(id, link)| (id.to_string(), link.to_string()))
            .collect()
    }

    fn resolver(debrid: Option<Arc<FakeDebrid>>, prober: Arc<FakeProber>) -> LinkResolver {
        LinkResolver::new(
            ResolverConfig::default().no_cache(),
            debrid.map(|d| d as Arc<dyn DebridApi>),
            prober,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BATCH PATH
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_batch_alive_and_down() {
        let debrid = FakeDebrid::answering(vec![
            LinkInfo::available("A", Some("Movie.2020.1080p.mkv")),
            LinkInfo::failed("B", "LINK_DOWN"),
        ]);
        let prober = Arc::new(FakeProber::default());
        let resolver = resolver(Some(debrid.clone()), prober.clone());

        let resolution = resolver.resolve_links(&links(&[("r1", "A"), ("r2", "B")])).await;

        assert_eq!(resolution.available, links(&[("r1", "A")]));
        assert_eq!(resolution.filename_for("A"), Some("Movie.2020.1080p"));
        assert_eq!(resolution.filenames.len(), 1);
        assert_eq!(resolution.path, ResolutionPath::Batch);
        assert_eq!(debrid.calls(), 1);
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batch_dedupes_shared_links() {
        let debrid = FakeDebrid::answering(vec![LinkInfo::available("A", Some("Show.S01.mkv"))]);
        let resolver = resolver(Some(debrid.clone()), Arc::new(FakeProber::default()));

        let resolution = resolver
            .resolve_links(&links(&[("r1", "A"), ("r2", "A")]))
            .await;

        assert_eq!(*debrid.requested.lock(), vec!["A".to_string()]);
        assert!(resolution.is_available("r1"));
        assert!(resolution.is_available("r2"));
        assert_eq!(resolution.filenames.len(), 1);
    }

    #[tokio::test]
    async fn test_batch_excludes_unreported_and_unknown_errors() {
        let debrid = FakeDebrid::answering(vec![
            LinkInfo::available("A", None),
            LinkInfo::failed("B", "LINK_HOST_NOT_SUPPORTED"),
            LinkInfo::available("Z", Some("Injected.mkv")),
        ]);
        let resolver = resolver(Some(debrid), Arc::new(FakeProber::default()));

        let input = links(&[("r1", "A"), ("r2", "B"), ("r3", "C")]);
        let resolution = resolver.resolve_links(&input).await;

        assert_eq!(resolution.available, links(&[("r1", "A")]));
        assert!(resolution.filenames.is_empty());
        for (id, link) in &resolution.available {
            assert_eq!(input.get(id), Some(link));
        }
        assert!(!resolution.filenames.contains_key("Z"));
    }

    #[tokio::test]
    async fn test_batch_filename_edge_cases() {
        let debrid = FakeDebrid::answering(vec![
            LinkInfo::available("A", Some("NoExtension")),
            LinkInfo::available("B", Some(".mkv")),
            LinkInfo::available("C", Some("Multi.Dot.Name.tar.gz")),
        ]);
        let resolver = resolver(Some(debrid), Arc::new(FakeProber::default()));

        let resolution = resolver
            .resolve_links(&links(&[("r1", "A"), ("r2", "B"), ("r3", "C")]))
            .await;

        assert_eq!(resolution.available.len(), 3);
        assert_eq!(resolution.filename_for("A"), Some("NoExtension"));
        assert_eq!(resolution.filename_for("B"), None);
        assert_eq!(resolution.filename_for("C"), Some("Multi.Dot.Name.tar"));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FALLBACK PATH
    // ═══════════════════════════════════════════════════════════════════════════

    fn fallback_prober() -> FakeProber {
        FakeProber::default()
            .with("A", ProbeMethod::Head, 200)
            .with("B", ProbeMethod::Head, 404)
            .with("C", ProbeMethod::Head, 405)
            .with("C", ProbeMethod::RangedGet, 206)
            .with("D", ProbeMethod::Head, 500)
            .with("F", ProbeMethod::Head, 405)
            .with("F", ProbeMethod::RangedGet, 404)
        // "E" has no status and times out
    }

    fn fallback_input() -> HashMap<ReleaseId, String> {
        links(&[
            ("r1", "A"),
            ("r2", "B"),
            ("r3", "C"),
            ("r4", "D"),
            ("r5", "E"),
            ("r6", "F"),
        ])
    }

    #[tokio::test]
    async fn test_fallback_without_credential() {
        let prober = Arc::new(fallback_prober());
        let resolver = resolver(None, prober.clone());

        let resolution = resolver.resolve_links(&fallback_input()).await;

        assert_eq!(resolution.available, links(&[("r1", "A"), ("r3", "C")]));
        assert!(resolution.filenames.is_empty());
        assert_eq!(
            resolution.path,
            ResolutionPath::Fallback(FallbackReason::NoCredential)
        );

        let calls = prober.calls();
        assert!(calls.contains(&("C".to_string(), ProbeMethod::RangedGet)));
        assert!(!calls.contains(&("A".to_string(), ProbeMethod::RangedGet)));
        assert!(!calls.contains(&("E".to_string(), ProbeMethod::RangedGet)));
    }

    #[tokio::test]
    async fn test_batch_failure_matches_fallback_only() {
        let debrid = FakeDebrid::failing();
        let with_failing_batch = resolver(Some(debrid.clone()), Arc::new(fallback_prober()));
        let without_batch = resolver(None, Arc::new(fallback_prober()));

        let degraded = with_failing_batch.resolve_links(&fallback_input()).await;
        let direct = without_batch.resolve_links(&fallback_input()).await;

        assert_eq!(debrid.calls(), 1);
        assert_eq!(degraded.available, direct.available);
        assert!(degraded.filenames.is_empty());
        assert!(matches!(
            degraded.path,
            ResolutionPath::Fallback(FallbackReason::BatchFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_api_key_is_no_credential() {
        let config = ResolverConfig::with_api_key("   ");
        assert!(config.credential().is_none());
        assert!(!LinkResolver::from_config(config).has_debrid());
        assert!(LinkResolver::from_config(ResolverConfig::with_api_key("k")).has_debrid());
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EDGE CASES
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let debrid = FakeDebrid::answering(vec![]);
        let prober = Arc::new(FakeProber::default());
        let resolver = resolver(Some(debrid.clone()), prober.clone());

        let resolution = resolver.resolve_links(&HashMap::new()).await;

        assert_eq!(resolution, LinkResolution::default());
        assert_eq!(debrid.calls(), 0);
        assert!(prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_link_is_skipped() {
        let prober = Arc::new(FakeProber::default().with("A", ProbeMethod::Head, 200));
        let resolver = resolver(None, prober.clone());

        let resolution = resolver.resolve_links(&links(&[("r1", ""), ("r2", "A")])).await;

        assert_eq!(resolution.available, links(&[("r2", "A")]));
        assert_eq!(prober.calls().len(), 1);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VERDICT CACHE
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn test_definitive_verdicts_are_cached() {
        let debrid = FakeDebrid::answering(vec![
            LinkInfo::available("A", Some("Movie.mkv")),
            LinkInfo::failed("B", "LINK_DOWN"),
            LinkInfo::failed("C", "LINK_TEMPORARY_UNAVAILABLE"),
        ]);
        let resolver = LinkResolver::new(
            ResolverConfig::default(),
            Some(debrid.clone() as Arc<dyn DebridApi>),
            Arc::new(FakeProber::default()),
        );
        let input = links(&[("r1", "A"), ("r2", "B"), ("r3", "C")]);

        let first = resolver.resolve_links(&input).await;
        let second = resolver.resolve_links(&input).await;

        assert_eq!(first.available, second.available);
        assert_eq!(second.filename_for("A"), Some("Movie"));
        assert_eq!(second.from_cache, 2);
        assert_eq!(debrid.calls(), 2);
        assert_eq!(debrid.requested.lock().as_slice(), ["A", "B", "C", "C"]);
        assert_eq!(resolver.cache_stats().map(|s| s.total_entries), Some(2));
    }

    #[tokio::test]
    async fn test_fully_cached_resolution_skips_transports() {
        let debrid = FakeDebrid::answering(vec![LinkInfo::available("A", None)]);
        let resolver = LinkResolver::new(
            ResolverConfig::default(),
            Some(debrid.clone() as Arc<dyn DebridApi>),
            Arc::new(FakeProber::default()),
        );

        resolver.resolve_links(&links(&[("r1", "A")])).await;
        let cached = resolver.resolve_links(&links(&[("r9", "A")])).await;

        assert_eq!(debrid.calls(), 1);
        assert_eq!(cached.path, ResolutionPath::NotNeeded);
        assert_eq!(cached.available, links(&[("r9", "A")]));

        assert_eq!(resolver.clear_cache(), 1);
        resolver.resolve_links(&links(&[("r1", "A")])).await;
        assert_eq!(debrid.calls(), 2);
    }

    #[tokio::test]
    async fn test_transient_probe_statuses_are_not_cached() {
        let debrid = FakeDebrid::recovering(
            1,
            vec![
                LinkInfo::available("A", Some("Movie.mkv")),
                LinkInfo::available("B", None),
            ],
        );
        let prober = Arc::new(
            FakeProber::default()
                .with("A", ProbeMethod::Head, 503)
                .with("B", ProbeMethod::Head, 429)
                .with("C", ProbeMethod::Head, 403),
        );
        let resolver = LinkResolver::new(
            ResolverConfig::default(),
            Some(debrid.clone() as Arc<dyn DebridApi>),
            prober,
        );
        let input = links(&[("r1", "A"), ("r2", "B"), ("r3", "C")]);

        let degraded = resolver.resolve_links(&input).await;
        assert!(degraded.available.is_empty());
        assert!(matches!(
            degraded.path,
            ResolutionPath::Fallback(FallbackReason::BatchFailed(_))
        ));
        assert_eq!(resolver.cache_stats().map(|s| s.total_entries), Some(1));

        let recovered = resolver.resolve_links(&input).await;
        assert_eq!(debrid.calls(), 2);
        assert_eq!(recovered.path, ResolutionPath::Batch);
        assert_eq!(recovered.from_cache, 1);
        assert_eq!(recovered.available, links(&[("r1", "A"), ("r2", "B")]));
        assert_eq!(recovered.filename_for("A"), Some("Movie"));
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Movie.2020.mkv"), "Movie.2020");
        assert_eq!(strip_extension("plain"), "plain");
        assert_eq!(strip_extension("trailing."), "trailing");
    }
}
