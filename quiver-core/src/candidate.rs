use serde::{Deserialize, Serialize};

/// Raw unit returned by a retriever backend: id, method-specific score,
/// and content. Scores are NOT comparable across backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDoc {
    pub id: String,
    pub score: f64,
    pub content: String,
}

/// A retrieved unit attributed to the method that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    /// Name of the retriever this candidate came from.
    pub retriever: String,
    /// Raw score on the source method's own scale.
    pub score: f64,
    pub content: String,
    /// Zero-based position in the source method's ranked list.
    pub rank: Option<usize>,
}

/// A candidate after rank fusion, carrying its normalized fused score and
/// the provenance of every method that contributed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusedCandidate {
    pub candidate: Candidate,
    /// Fused score normalized to [0, 1] within the result it belongs to.
    pub fused_score: f64,
    /// Every retriever that surfaced this candidate (or a near-duplicate
    /// merged into it).
    pub sources: Vec<String>,
    /// Index of the subtask this candidate was retrieved for. Earlier
    /// subtasks win score ties in the cross-subtask merge.
    pub subtask_index: usize,
}

/// Ordered fusion output for one subtask, or for the whole query after the
/// cross-subtask merge.
///
/// Invariants: no duplicate candidate ids; ordered by descending fused
/// score with a deterministic tie-break (lower original rank, then id).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FusedResult {
    pub candidates: Vec<FusedCandidate>,
}

impl FusedResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}
