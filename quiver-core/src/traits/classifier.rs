use crate::errors::QuiverResult;
use crate::query::TaskType;

/// Query classification and decomposition backend (LLM or rule engine).
///
/// Both calls fail soft at the call sites: classification falls back to a
/// deterministic heuristic, decomposition to the identity decomposition.
pub trait IQueryClassifier: Send + Sync {
    fn classify(&self, text: &str) -> QuiverResult<TaskType>;

    /// Split a query into sub-queries. An empty result means the backend
    /// judged the query atomic.
    fn decompose(&self, text: &str) -> QuiverResult<Vec<String>>;
}
