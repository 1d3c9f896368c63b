//! Reject-on-duplicate admission control.

use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::key_preview;

/// Set of keys whose work is currently in flight.
///
/// This is not a coalescing single-flight: a rejected caller gets nothing
/// back and is expected to retry later. Admission is binary and not
/// reentrant, so a second `acquire` for a held key fails even when it comes
/// from the holder itself.
#[derive(Debug)]
pub struct RequestGuard {
    name: String,
    active: Mutex<HashSet<String>>,
}

impl RequestGuard {
    /// Creates an empty guard.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: Mutex::new(HashSet::new()),
        }
    }

    /// Name used in log lines.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tries to take the key. Returns `false` if it is already held.
    ///
    /// A successful call must be paired with [`RequestGuard::release`] on
    /// every exit path; prefer [`RequestGuard::try_acquire`], which does it
    /// on drop.
    pub fn acquire(&self, key: &str) -> bool {
        let mut active = self.active.lock();
        if active.contains(key) {
            info!(guard = %self.name, key = key_preview(key), "Rejecting duplicate request");
            return false;
        }
        active.insert(key.to_string());
        debug!(guard = %self.name, key = key_preview(key), "Acquired lock");
        true
    }

    /// Releases the key. Releasing a key that is not held does nothing.
    pub fn release(&self, key: &str) {
        if self.active.lock().remove(key) {
            debug!(guard = %self.name, key = key_preview(key), "Released lock");
        }
    }

    /// Point-in-time membership check, for diagnostics only.
    pub fn is_locked(&self, key: &str) -> bool {
        self.active.lock().contains(key)
    }

    /// Number of keys currently held.
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }

    /// Takes the key and returns a permit that releases it when dropped.
    pub fn try_acquire(&self, key: &str) -> Option<InFlightPermit<'_>> {
        self.acquire(key).then(|| InFlightPermit {
            guard: self,
            key: key.to_string(),
        })
    }
}

/// Proof of admission for one key. Dropping it releases the key, whether the
/// holder returned normally, bailed out with an error, panicked or was
/// cancelled.
#[must_use = "dropping the permit releases the key immediately"]
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    guard: &'a RequestGuard,
    key: String,
}

impl InFlightPermit<'_> {
    /// The key this permit holds.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.guard.release(&self.key);
    }
}
