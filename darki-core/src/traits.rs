//! Common traits for darki.
//!
//! The release source sits outside the proxy's core: it may scrape a site,
//! query an indexer API or return fixtures in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ReleaseCandidate, SearchQuery};

// ═══════════════════════════════════════════════════════════════════════════════
// RELEASE SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for whatever produces raw release candidates for a search.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Returns the candidates matching a validated query.
    ///
    /// Candidates are not link-checked; that is the resolver's job.
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<ReleaseCandidate>>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
