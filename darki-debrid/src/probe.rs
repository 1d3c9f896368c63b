//! Direct HTTP probes of hoster links.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RANGE;
use reqwest::Client;
use tracing::{debug, instrument};

use darki_core::constants::PROBE_TIMEOUT_SECS;
use darki_core::error::{DarkiError, Result};

use crate::transport::{LinkProber, ProbeMethod};

/// Probes links with real HTTP requests, following redirects.
#[derive(Clone, Debug)]
pub struct HttpProber {
    http: Client,
}

impl HttpProber {
    /// Creates a prober with the default per-request timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
    }

    /// Creates a prober with a custom per-request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    #[instrument(skip(self))]
    async fn probe(&self, link: &str, method: ProbeMethod) -> Result<u16> {
        let request = match method {
            ProbeMethod::Head => self.http.head(link),
            ProbeMethod::RangedGet => self.http.get(link).header(RANGE, "bytes=0-0"),
        };

        // The body is never read; dropping the response closes the stream.
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DarkiError::ConnectionTimeout(link.to_string())
            } else {
                DarkiError::HttpError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        debug!(status, "Probe answered");
        Ok(status)
    }
}
