//! Domain types for darki.
//!
//! - [`SearchQuery`]: validated search parameters and their cache key
//! - [`MediaType`]: movie / series / animes
//! - [`ReleaseCandidate`]: raw candidate produced by the release source
//! - [`Release`]: candidate whose link was confirmed alive, with its final name

mod query;
mod release;

pub use query::*;
pub use release::*;
