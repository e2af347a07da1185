//! Best-effort answer memoization.
//!
//! Keyed by (normalized query text, active strategy signature), so a
//! downgraded run never serves a full-strategy hit or vice versa.
//! Read-through: a miss or expired entry only costs the recompute.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;

use quiver_core::answer::AnswerResult;
use quiver_core::config::CacheConfig;
use quiver_core::text::normalize;

/// Build the cache key for a query under an active strategy signature.
pub fn key(query_text: &str, signature: &str) -> String {
    format!("{}|{signature}", normalize(query_text))
}

/// TTL + capacity bounded answer cache with hit/miss tracking.
pub struct AnswerCache {
    cache: Cache<String, AnswerResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnswerCache {
    pub fn new(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<AnswerResult> {
        match self.cache.get(key) {
            Some(hit) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(hit)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: String, result: AnswerResult) {
        self.cache.insert(key, result);
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }
}
