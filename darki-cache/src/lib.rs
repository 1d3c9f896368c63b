//! TTL cache and single-flight request guard.
//!
//! [`TtlCache`] is a generic in-memory store with lazy expiration;
//! [`RequestGuard`] rejects a request while another one with the same key
//! is in flight. Together they absorb duplicate and repeated searches.

mod cache;
mod clock;
mod guard;

pub use cache::{CacheStats, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::{InFlightPermit, RequestGuard};

/// Shortens a key for log output.
pub(crate) fn key_preview(key: &str) -> &str {
    match key.char_indices().nth(darki_core::LOG_KEY_PREVIEW_CHARS) {
        Some((idx, _)) => &key[..idx],
        None => key,
    }
}
