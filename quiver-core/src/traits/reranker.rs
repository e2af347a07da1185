use crate::errors::QuiverResult;

/// Pairwise query-candidate relevance scoring (cross-encoder or similar).
pub trait IRerankerBackend: Send + Sync {
    /// Score each content against the query. The returned vector is
    /// aligned by index with `contents` and must have the same length.
    fn score(&self, query_text: &str, contents: &[&str]) -> QuiverResult<Vec<f64>>;
}
