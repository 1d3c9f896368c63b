//! Policy constants for darki.
//!
//! TTLs are sized for the traffic we front: media managers fire the same
//! search twice within seconds, while link liveness changes slowly.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default TTL for cached search responses, in seconds.
/// Long enough to absorb a client's immediate duplicate retry.
pub const SEARCH_CACHE_TTL_SECS: u64 = 60;

/// Default TTL for cached link verdicts, in seconds.
pub const LINK_CACHE_TTL_SECS: u64 = 300;

/// Default interval between expired-entry sweeps, in seconds.
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 60;

/// Number of key characters shown in log lines.
pub const LOG_KEY_PREVIEW_CHARS: usize = 50;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTBOUND TIMEOUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Timeout for a single link availability probe, in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 10;

/// Timeout for the batch debrid call, in seconds.
pub const DEBRID_TIMEOUT_SECS: u64 = 30;

/// Timeout for the upstream release source, in seconds.
pub const SOURCE_TIMEOUT_SECS: u64 = 30;

/// Maximum number of fallback probes in flight for one resolution.
pub const DEFAULT_PROBE_CONCURRENCY: usize = 8;

// ═══════════════════════════════════════════════════════════════════════════════
// DEBRID PROTOCOL
// ═══════════════════════════════════════════════════════════════════════════════

/// AllDebrid API base URL.
pub const ALLDEBRID_API_BASE: &str = "https://api.alldebrid.com";

/// Path of the batch link information endpoint.
pub const ALLDEBRID_INFOS_PATH: &str = "/v4/link/infos";

/// Error code the debrid API uses for links that no longer exist.
pub const LINK_DOWN_CODE: &str = "LINK_DOWN";

/// Top-level status value of a successful debrid response.
pub const DEBRID_STATUS_SUCCESS: &str = "success";

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER
// ═══════════════════════════════════════════════════════════════════════════════

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5002;

/// Release name used when nothing is known about a candidate.
pub const UNKNOWN_RELEASE_NAME: &str = "Unknown";
