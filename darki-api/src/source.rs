//! HTTP release source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, instrument};

use darki_core::constants::SOURCE_TIMEOUT_SECS;
use darki_core::error::{DarkiError, Result};
use darki_core::traits::ReleaseSource;
use darki_core::types::{ReleaseCandidate, SearchQuery};

/// Fetches candidates from `GET {base}/api/search`.
///
/// The request carries the normalized query as `name`, plus `type`, `season`
/// and `ep` when set. The body is a JSON array of candidates.
#[derive(Clone, Debug)]
pub struct UpstreamSource {
    base_url: String,
    http: Client,
}

impl UpstreamSource {
    /// Creates a source with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(SOURCE_TIMEOUT_SECS))
    }

    /// Creates a source with a custom timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            http,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReleaseSource for UpstreamSource {
    #[instrument(skip(self), fields(source = %self.base_url))]
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<ReleaseCandidate>> {
        let url = self.search_url();

        let mut params = vec![
            ("name", query.normalized_query()),
            ("type", query.media_type.to_string()),
        ];
        if let Some(season) = query.season {
            params.push(("season", season.to_string()));
        }
        if let Some(episode) = query.episode {
            params.push(("ep", episode.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DarkiError::ConnectionTimeout(url.clone())
                } else {
                    DarkiError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DarkiError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }

        let candidates: Vec<ReleaseCandidate> = response
            .json()
            .await
            .map_err(|e| DarkiError::SourceError(format!("invalid candidate list: {e}")))?;

        debug!(count = candidates.len(), "Fetched release candidates");
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "upstream"
    }
}
