//! App state: config, release source, search service.

use std::sync::Arc;
use std::time::Duration;

use darki_core::constants::{
    CACHE_SWEEP_INTERVAL_SECS, DEFAULT_PORT, LINK_CACHE_TTL_SECS, SEARCH_CACHE_TTL_SECS,
};
use darki_core::traits::ReleaseSource;
use darki_debrid::{LinkResolver, ResolverConfig};
use tracing::warn;

use crate::search::SearchService;
use crate::source::UpstreamSource;

const DEFAULT_SOURCE_URL: &str = "https://darkiworld15.com/";

/// Server configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL of the release source
    pub source_url: String,
    /// AllDebrid API key. `None` forces per-link probing.
    pub alldebrid_key: Option<String>,
    /// Lowercased hoster allow-list. Empty admits every hoster.
    pub allowed_hosters: Vec<String>,
    /// Listening port
    pub port: u16,
    /// Debug logging
    pub debug: bool,
    /// Search cache TTL in seconds
    pub search_cache_ttl: u64,
    /// Link verdict cache TTL in seconds
    pub link_cache_ttl: u64,
    /// Interval between expired-entry sweeps in seconds. 0 disables the sweep.
    pub sweep_interval: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.into(),
            alldebrid_key: None,
            allowed_hosters: Vec::new(),
            port: DEFAULT_PORT,
            debug: false,
            search_cache_ttl: SEARCH_CACHE_TTL_SECS,
            link_cache_ttl: LINK_CACHE_TTL_SECS,
            sweep_interval: CACHE_SWEEP_INTERVAL_SECS,
        }
    }
}

impl ApiConfig {
    /// Loads `.env` if present, then reads the `DARKIWORLD_*` variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            source_url: non_empty_var("DARKIWORLD_URL").unwrap_or(defaults.source_url),
            alldebrid_key: non_empty_var("DARKIWORLD_ALLDEBRID_KEY"),
            allowed_hosters: std::env::var("DARKIWORLD_ALLOWED_HOSTER")
                .map(|v| parse_hoster_list(&v))
                .unwrap_or_default(),
            port: parsed_var("DARKIWORLD_PORT").unwrap_or(defaults.port),
            debug: std::env::var("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            search_cache_ttl: parsed_var("SEARCH_CACHE_TTL").unwrap_or(defaults.search_cache_ttl),
            link_cache_ttl: parsed_var("LINK_CACHE_TTL").unwrap_or(defaults.link_cache_ttl),
            sweep_interval: parsed_var("CACHE_SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
        }
    }

    /// Resolver settings derived from this config.
    pub fn resolver_config(&self) -> ResolverConfig {
        let config = ResolverConfig::default().cache_ttl(self.link_cache_ttl);
        match &self.alldebrid_key {
            Some(key) => ResolverConfig {
                api_key: Some(key.clone()),
                ..config
            },
            None => config,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    parse_value(name, &non_empty_var(name)?)
}

/// Parses a setting, logging and discarding values that do not parse.
fn parse_value<T: std::str::FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = raw, "Ignoring malformed setting, using the default");
            None
        }
    }
}

/// Splits a comma-separated hoster list, trimming and lowercasing entries.
pub fn parse_hoster_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Configuration the state was built from
    pub config: ApiConfig,
    /// Search orchestration
    pub search: SearchService,
}

impl AppState {
    /// Builds the state with the HTTP release source and AllDebrid resolver.
    pub fn new(config: ApiConfig) -> Self {
        let source = Arc::new(UpstreamSource::new(&config.source_url));
        let resolver = LinkResolver::from_config(config.resolver_config());
        Self::with_components(config, source, resolver)
    }

    /// Builds the state around an explicit source and resolver.
    pub fn with_components(
        config: ApiConfig,
        source: Arc<dyn ReleaseSource>,
        resolver: LinkResolver,
    ) -> Self {
        let search = SearchService::new(
            source,
            resolver,
            Duration::from_secs(config.search_cache_ttl),
            config.allowed_hosters.clone(),
        );

        Self { config, search }
    }
}
