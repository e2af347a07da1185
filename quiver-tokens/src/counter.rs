use std::sync::Arc;

use moka::sync::Cache;
use tiktoken_rs::CoreBPE;

/// Token counter over tiktoken's `cl100k_base` encoding.
///
/// Budget enforcement repeatedly counts the same candidate contents across
/// the rerank and generation stages, so counts are cached per blake3
/// content hash.
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
    cache: Cache<String, usize>,
}

impl TokenCounter {
    pub fn new(cache_capacity: u64) -> Self {
        let bpe = tiktoken_rs::cl100k_base().expect("cl100k_base tokenizer unavailable");
        Self {
            bpe: Arc::new(bpe),
            cache: Cache::new(cache_capacity),
        }
    }

    /// Exact token count, uncached.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Token count with content-hash caching. Repeated calls with the
    /// same text hit the cache.
    pub fn count_cached(&self, text: &str) -> usize {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        self.cache.get_with(hash, || self.count(text))
    }

    /// Sum of cached counts over several texts.
    pub fn count_total<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> usize {
        texts.into_iter().map(|t| self.count_cached(t)).sum()
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_positive_for_nonempty_text() {
        let counter = TokenCounter::default();
        assert!(counter.count("the capital of France is Paris") > 0);
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn cached_count_matches_uncached() {
        let counter = TokenCounter::default();
        let text = "weighted reciprocal rank fusion";
        assert_eq!(counter.count_cached(text), counter.count(text));
        // Second lookup served from cache.
        assert_eq!(counter.count_cached(text), counter.count(text));
    }

    #[test]
    fn total_sums_individual_counts() {
        let counter = TokenCounter::default();
        let a = "alpha beta";
        let b = "gamma delta epsilon";
        assert_eq!(
            counter.count_total([a, b]),
            counter.count(a) + counter.count(b)
        );
    }
}