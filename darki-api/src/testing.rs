//! Fakes shared by the router and service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use darki_core::error::{DarkiError, Result};
use darki_core::traits::ReleaseSource;
use darki_core::types::{ReleaseCandidate, SearchQuery};
use darki_debrid::{DebridApi, LinkInfo, LinkProber, LinkResolver, ProbeMethod, ResolverConfig};

pub(crate) struct StaticSource {
    candidates: Vec<ReleaseCandidate>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticSource {
    pub(crate) fn new(candidates: Vec<ReleaseCandidate>) -> Arc<Self> {
        Arc::new(Self {
            candidates,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            candidates: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseSource for StaticSource {
    async fn fetch_candidates(&self, _query: &SearchQuery) -> Result<Vec<ReleaseCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DarkiError::ConnectionTimeout("source".into()));
        }
        Ok(self.candidates.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

pub(crate) struct FixedDebrid(pub Vec<LinkInfo>);

#[async_trait]
impl DebridApi for FixedDebrid {
    async fn link_infos(&self, _links: &[String]) -> Result<Vec<LinkInfo>> {
        Ok(self.0.clone())
    }
}

/// Every probe answers 404.
pub(crate) struct DeadProber;

#[async_trait]
impl LinkProber for DeadProber {
    async fn probe(&self, _link: &str, _method: ProbeMethod) -> Result<u16> {
        Ok(404)
    }
}

pub(crate) fn candidates() -> Vec<ReleaseCandidate> {
    vec![
        ReleaseCandidate::new("r1", "http://x/a", "Poster for Avatar")
            .with_quality("1080p")
            .with_languages(["French", "English"])
            .with_hoster("1fichier"),
        ReleaseCandidate::new("r2", "http://x/b", "Avatar")
            .with_quality("720p")
            .with_languages(["French"])
            .with_hoster("1fichier"),
        ReleaseCandidate::new("r3", "http://x/c", "Avatar").with_hoster("uptobox"),
    ]
}

/// Resolver whose batch call reports every link of [`candidates`] alive.
pub(crate) fn batch_resolver() -> LinkResolver {
    LinkResolver::new(
        ResolverConfig::default(),
        Some(Arc::new(FixedDebrid(vec![
            LinkInfo::available("http://x/a", Some("Avatar.2009.MULTi.1080p.mkv")),
            LinkInfo::available("http://x/b", None),
            LinkInfo::available("http://x/c", None),
        ]))),
        Arc::new(DeadProber),
    )
}
