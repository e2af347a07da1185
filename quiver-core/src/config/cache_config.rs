use serde::{Deserialize, Serialize};

use super::defaults;

/// Answer cache configuration. The cache is read-through and best-effort;
/// a miss never blocks correctness, only performance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CACHE_ENABLED,
            capacity: defaults::DEFAULT_CACHE_CAPACITY,
            ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
        }
    }
}
