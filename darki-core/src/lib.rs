//! # darki core
//!
//! Core types, errors, and traits shared by every darki crate.
//!
//! - **Types**: search queries, release candidates and finished releases
//! - **Errors**: one error enum for the whole workspace
//! - **Constants**: cache TTLs, timeouts and debrid protocol values
//! - **Traits**: the seam to the external release source
//!
//! ## Example
//!
//! ```rust
//! use darki_core::{MediaType, SearchQuery};
//!
//! let query = SearchQuery::new("Jujutsu Kaisen TV", MediaType::Series).with_season(1);
//! assert_eq!(query.normalized_query(), "jujutsu kaisen");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{DarkiError, Result};
pub use traits::*;
pub use types::*;
