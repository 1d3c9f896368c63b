//! Transport seams used by the resolver.
//!
//! The batch call and the per-link probes go through separate traits so a
//! failing debrid API can be simulated without touching the probes.

use async_trait::async_trait;
use serde::Deserialize;

use darki_core::error::Result;
use darki_core::LINK_DOWN_CODE;

/// Batch link information endpoint of a debrid service.
#[async_trait]
pub trait DebridApi: Send + Sync {
    /// Looks up every link in one call.
    ///
    /// Any `Err` (transport failure, bad HTTP status, undecodable body,
    /// non-success API status) makes the resolver fall back to probing.
    async fn link_infos(&self, links: &[String]) -> Result<Vec<LinkInfo>>;
}

/// How a single link is probed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProbeMethod {
    /// `HEAD` request.
    Head,
    /// `GET` asking for the first byte only (`Range: bytes=0-0`).
    RangedGet,
}

/// Direct HTTP existence check of a link.
#[async_trait]
pub trait LinkProber: Send + Sync {
    /// Returns the final HTTP status after redirects.
    ///
    /// `Err` means no status was obtained (timeout, connection failure).
    async fn probe(&self, link: &str, method: ProbeMethod) -> Result<u16>;
}

/// Per-link entry of a batch response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LinkInfo {
    /// The link as echoed back by the API
    #[serde(default)]
    pub link: Option<String>,
    /// Hoster filename, with extension
    #[serde(default)]
    pub filename: Option<String>,
    /// Hoster name
    #[serde(default)]
    pub host: Option<String>,
    /// Per-link error, if the API could not handle this link
    #[serde(default)]
    pub error: Option<DebridErrorBody>,
}

impl LinkInfo {
    /// Entry for a link the API recognised.
    pub fn available(link: impl Into<String>, filename: Option<&str>) -> Self {
        Self {
            link: Some(link.into()),
            filename: filename.map(str::to_string),
            ..Default::default()
        }
    }

    /// Entry for a link the API rejected with `code`.
    pub fn failed(link: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            error: Some(DebridErrorBody {
                code: code.into(),
                message: String::new(),
            }),
            ..Default::default()
        }
    }

    /// Returns the error body if it carries anything.
    pub fn error(&self) -> Option<&DebridErrorBody> {
        self.error.as_ref().filter(|e| !e.is_empty())
    }
}

/// Error object of the debrid API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DebridErrorBody {
    /// Machine-readable code (e.g. `LINK_DOWN`)
    #[serde(default)]
    pub code: String,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

impl DebridErrorBody {
    /// An error object with neither code nor message counts as no error.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }

    /// True for the "link no longer exists" code.
    pub fn is_link_down(&self) -> bool {
        self.code == LINK_DOWN_CODE
    }
}

/// Full batch response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct LinkInfosResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<LinkInfosData>,
    #[serde(default)]
    pub error: Option<DebridErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LinkInfosData {
    #[serde(default)]
    pub infos: Vec<LinkInfo>,
}
