//! Response cache for idempotent API reads
//!
//! Keeps GET responses in memory for the lifetime of a client so repeated
//! reads within the TTL do not hit the network. Mutating calls are expected
//! to invalidate the affected resource explicitly.

pub mod key;
pub mod storage;

use std::time::Duration;

/// Default cache TTLs
pub struct CacheTtl;

impl CacheTtl {
    /// Applied to every cached GET unless the request overrides it
    pub const DEFAULT: Duration = Duration::from_secs(5 * 60); // 5 min

    // Scan results are immutable once the scan completes
    pub const SCAN_RESULTS: Duration = Duration::from_secs(60 * 60); // 1 hr
    pub const SCAN_RESULT_LIST: Duration = Duration::from_secs(60); // 1 min
}

pub use key::{cache_key, resource_tag};
pub use storage::{CacheStats, ResponseCache};
