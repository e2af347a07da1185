/// Result alias used across all quiver crates.
pub type QuiverResult<T> = Result<T, QuiverError>;

/// Pipeline error taxonomy.
///
/// Every stage isolates failures to its own unit of work (a single
/// retriever, a single subtask, a single backend) and continues with
/// reduced input. Most variants are recorded as degradations rather than
/// propagated; only generation failure after the fallback is exhausted
/// reaches the caller, and it does so as a failure marker on the
/// `AnswerResult`, not as an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum QuiverError {
    #[error("retriever unavailable: {retriever}: {reason}")]
    RetrieverUnavailable { retriever: String, reason: String },

    #[error("all retrievers failed for subtask: {subtask}")]
    AllRetrieversFailed { subtask: String },

    #[error("rerank unavailable: {reason}")]
    RerankUnavailable { reason: String },

    #[error("generation failed: {backend}: {reason}")]
    GenerationFailed { backend: String, reason: String },

    #[error("classifier unavailable: {reason}")]
    ClassifierUnavailable { reason: String },

    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },
}
