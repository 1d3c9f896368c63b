//! AllDebrid batch client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, instrument};

use darki_core::constants::{
    ALLDEBRID_API_BASE, ALLDEBRID_INFOS_PATH, DEBRID_STATUS_SUCCESS, DEBRID_TIMEOUT_SECS,
};
use darki_core::error::{DarkiError, Result};

use crate::transport::{DebridApi, LinkInfo, LinkInfosResponse};

/// Configuration for the AllDebrid client
#[derive(Clone, Debug)]
pub struct DebridConfig {
    /// API key, sent as a bearer token
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl DebridConfig {
    /// Creates a config against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: ALLDEBRID_API_BASE.into(),
            timeout_seconds: DEBRID_TIMEOUT_SECS,
        }
    }

    /// Points the client at another base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Client for `POST /v4/link/infos`.
#[derive(Clone, Debug)]
pub struct AllDebridClient {
    config: DebridConfig,
    http: Client,
}

impl AllDebridClient {
    /// Creates a new client.
    pub fn new(config: DebridConfig) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, http }
    }

    fn infos_url(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            ALLDEBRID_INFOS_PATH
        )
    }
}

#[async_trait]
impl DebridApi for AllDebridClient {
    #[instrument(skip(self, links), fields(links = links.len()))]
    async fn link_infos(&self, links: &[String]) -> Result<Vec<LinkInfo>> {
        let url = self.infos_url();
        let form: Vec<(&str, &str)> = links.iter().map(|l| ("link[]", l.as_str())).collect();

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DarkiError::ConnectionTimeout(format!("debrid batch call: {e}"))
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

        let body: LinkInfosResponse = response
            .json()
            .await
            .map_err(|e| DarkiError::DebridUnexpectedResponse(e.to_string()))?;

        if body.status != DEBRID_STATUS_SUCCESS {
            let error = body.error.unwrap_or_default();
            return Err(DarkiError::DebridApiError {
                code: if error.code.is_empty() { "UNKNOWN".into() } else { error.code },
                message: error.message,
            });
        }

        let infos = body.data.map(|d| d.infos).unwrap_or_default();
        debug!(reported = infos.len(), "Debrid batch call succeeded");
        Ok(infos)
    }
}
