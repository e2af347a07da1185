use crate::candidate::RetrievedDoc;
use crate::errors::QuiverResult;

/// One retrieval method (keyword, dense, web, ...).
///
/// Must return within a bounded time or raise a timeout-classified error;
/// the fusion engine additionally enforces its own per-call timeout and
/// drops the method from the plan for the request on failure.
pub trait IRetrieverBackend: Send + Sync {
    /// Retrieve up to `top_k` candidates for the query, ordered by the
    /// method's own relevance scale (best first).
    fn retrieve(&self, query_text: &str, top_k: usize) -> QuiverResult<Vec<RetrievedDoc>>;
}
