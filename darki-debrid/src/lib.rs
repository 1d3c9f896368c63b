//! # darki debrid
//!
//! Link availability checks for release candidates.
//!
//! [`LinkResolver`] asks the debrid API about every candidate link in one
//! batch call, which also yields the exact hoster filenames. When no API key
//! is configured, or the batch call fails, it falls back to probing each link
//! directly over HTTP. It never returns an error: a link that cannot be
//! confirmed is simply left out of the result.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use darki_debrid::{LinkResolver, ResolverConfig};
//!
//! let resolver = LinkResolver::from_config(ResolverConfig::with_api_key("KEY"));
//! let links = HashMap::from([("r1".to_string(), "https://1fichier.com/?abc".to_string())]);
//! let resolution = resolver.resolve_links(&links).await;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod alldebrid;
mod probe;
mod resolver;
mod transport;

pub use alldebrid::{AllDebridClient, DebridConfig};
pub use probe::HttpProber;
pub use resolver::{FallbackReason, LinkResolution, LinkResolver, ResolutionPath, ResolverConfig};
pub use transport::{DebridApi, DebridErrorBody, LinkInfo, LinkProber, ProbeMethod};
