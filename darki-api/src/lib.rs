//! # darki API Server
//!
//! HTTP search front for media managers. Searches go through a short-lived
//! response cache and a duplicate guard, then to the release source, and only
//! releases whose links are alive are returned.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness and uptime
//! - `GET /search?name=..&type=..&season=..&ep=..` - Search releases
//! - `GET /api/v1/cache/stats` - Cache statistics
//! - `POST /api/v1/cache/clear` - Drop every cached entry
//!
//! ## Example
//!
//! ```rust,ignore
//! use darki_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env();
//! let server = ApiServer::new(config);
//! server.run(([0, 0, 0, 0], 5002)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod search;
mod source;
mod state;
mod sweeper;

#[cfg(test)]
mod testing;

pub use dto::{SearchParams, SearchResponse};
pub use error::ApiError;
pub use routes::create_router;
pub use search::{SearchOutcome, SearchService};
pub use source::UpstreamSource;
pub use state::{parse_hoster_list, ApiConfig, AppState};
pub use sweeper::spawn_cache_sweeper;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for darki.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Creates a server around prebuilt state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address, sweeping caches in the background.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        let sweep_every = self.state.config.sweep_interval;
        let sweeper = (sweep_every > 0)
            .then(|| spawn_cache_sweeper(self.state.clone(), Duration::from_secs(sweep_every)));

        handlers::mark_started();
        info!(
            %addr,
            debrid = self.state.search.resolver().has_debrid(),
            hosters = ?self.state.config.allowed_hosters,
            "darki API server listening"
        );

        let result = axum::serve(listener, self.router()).await;
        if let Some(handle) = sweeper {
            handle.abort();
        }
        result
    }
}

/// Starts the API server with configuration from the environment.
pub async fn start_server(port: u16) -> std::io::Result<()> {
    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);
    server.run(([0, 0, 0, 0], port)).await
}
