//! Periodic removal of expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::state::AppState;

/// Spawns a task that sweeps both caches every `every`.
///
/// Expiry is already enforced on read; the sweep only bounds memory held by
/// keys that are never asked for again.
pub fn spawn_cache_sweeper(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let (search, links) = state.search.sweep_expired();
            if search + links > 0 {
                debug!(search, links, "Swept expired cache entries");
            }
        }
    })
}
