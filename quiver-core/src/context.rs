use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Upper bounds on the evidence handed to generation. Whichever bound is
/// reached first stops acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextBudget {
    pub max_tokens: usize,
    pub max_items: usize,
}

/// One accepted piece of evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextItem {
    pub candidate: Candidate,
    /// Blended relevance: `alpha * rerank + (1 - alpha) * fused`, or the
    /// fused score alone when reranking was unavailable.
    pub final_score: f64,
    /// Secondary relevance score from the reranking backend, when it ran.
    pub rerank_score: Option<f64>,
    /// Highest pairwise similarity to any item accepted before this one.
    /// Always below the redundancy threshold for accepted items.
    pub max_similarity: f64,
}

/// The reranker's output: ordered evidence bounded by the context budget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedContext {
    pub items: Vec<ContextItem>,
    /// `1 - mean pairwise similarity` over accepted items. 1.0 when fewer
    /// than two items were accepted.
    pub diversity_score: f64,
    /// Total token count of accepted content.
    pub token_count: usize,
    /// Set when the reranking backend failed and fused order was used.
    pub degraded: bool,
}

impl RankedContext {
    pub fn empty() -> Self {
        Self {
            diversity_score: 1.0,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
