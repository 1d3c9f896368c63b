//! In-memory TTL cache with lazy expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};

/// Longest lifetime an entry can get. Larger TTLs are clamped to it so the
/// expiry instant never overflows.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Cache entry with its absolute expiry.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe key/value cache whose entries expire after a TTL.
///
/// Expired entries are not swept proactively: a lookup that finds one
/// removes it and reports a miss. [`TtlCache::clear_expired`] exists for
/// periodic housekeeping. There is no capacity bound and no LRU; the key
/// space (normalized queries, link URLs) is small and short-lived.
///
/// Every operation takes the single internal mutex for its full duration.
pub struct TtlCache<K, V> {
    name: String,
    default_ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Debug,
    V: Clone,
{
    /// Creates a cache reading the system clock.
    pub fn new(name: impl Into<String>, default_ttl: Duration) -> Self {
        Self::with_clock(name, default_ttl, Arc::new(SystemClock))
    }

    /// Creates a cache with an explicit clock.
    pub fn with_clock(name: impl Into<String>, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            default_ttl,
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// TTL applied by [`TtlCache::set`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the cached value if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + Debug + ?Sized,
    {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let entry = entries.get(key)?;
        if !entry.is_expired(now) {
            debug!(cache = %self.name, ?key, "Cache hit");
            return Some(entry.value.clone());
        }

        entries.remove(key);
        debug!(cache = %self.name, ?key, "Cache expired");
        None
    }

    /// Caches a value with the default TTL, replacing any previous entry.
    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Caches a value with a custom TTL, replacing any previous entry.
    ///
    /// TTLs beyond roughly a century are clamped.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let now = self.clock.now();
        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);
        let mut entries = self.entries.lock();
        debug!(cache = %self.name, ?key, ttl_secs = ttl.as_secs(), "Cached");
        entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn clear_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(cache = %self.name, removed, "Cleared expired entries");
        }
        removed
    }

    /// Removes every entry and returns how many were dropped.
    pub fn clear_all(&self) -> usize {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        info!(cache = %self.name, count, "Cleared all entries");
        count
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn size(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();

        CacheStats {
            name: self.name.clone(),
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            default_ttl_seconds: self.default_ttl.as_secs(),
        }
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Cache name
    pub name: String,
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Expired entries not yet purged
    pub expired_entries: usize,
    /// Live entries
    pub valid_entries: usize,
    /// Default TTL in seconds
    pub default_ttl_seconds: u64,
}
