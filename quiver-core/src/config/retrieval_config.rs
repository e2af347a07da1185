use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::query::TaskType;

/// Retrieval planning, fusion, and reranking configuration.
///
/// The per-task-type weight tables are the central adaptivity knob: the
/// same subtask yields a different plan under a different task type, and
/// new retrievers or task types are added as table rows, not code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Task type → (retriever name → weight). Missing task types fall
    /// back to an even split across enabled retrievers.
    pub task_weights: BTreeMap<TaskType, BTreeMap<String, f64>>,
    /// Retrievers eligible for planning. A retriever absent from this
    /// list is never selected even if registered.
    pub enabled_retrievers: Vec<String>,
    /// Candidates requested from each retriever.
    pub top_k: usize,
    /// RRF damping constant. Tunable, not load-bearing.
    pub rrf_k: u32,
    /// Per-retrieval-call timeout. A call past this is dropped from the
    /// plan for the request.
    pub retrieval_timeout_ms: u64,
    /// Content similarity at or above which two candidates with different
    /// ids are merged as near-duplicates.
    pub dedup_similarity: f64,
    /// Module switch: disabling passes the fused order through directly.
    pub rerank_enabled: bool,
    /// How many fused candidates get the expensive rerank pass.
    pub rerank_top_k: usize,
    /// Blend factor: `final = alpha * rerank + (1 - alpha) * fused`.
    pub rerank_alpha: f64,
    /// Pairwise similarity at or above which a candidate is rejected by
    /// the redundancy filter.
    pub redundancy_threshold: f64,
    /// Global context budget in tokens, applied after the cross-subtask
    /// merge.
    pub context_token_budget: usize,
    /// Global context budget in items.
    pub context_item_budget: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            task_weights: default_task_weights(),
            enabled_retrievers: vec![
                "keyword".to_string(),
                "dense".to_string(),
                "web".to_string(),
            ],
            top_k: defaults::DEFAULT_TOP_K,
            rrf_k: defaults::DEFAULT_RRF_K,
            retrieval_timeout_ms: defaults::DEFAULT_RETRIEVAL_TIMEOUT_MS,
            dedup_similarity: defaults::DEFAULT_DEDUP_SIMILARITY,
            rerank_enabled: defaults::DEFAULT_RERANK_ENABLED,
            rerank_top_k: defaults::DEFAULT_RERANK_TOP_K,
            rerank_alpha: defaults::DEFAULT_RERANK_ALPHA,
            redundancy_threshold: defaults::DEFAULT_REDUNDANCY_THRESHOLD,
            context_token_budget: defaults::DEFAULT_CONTEXT_TOKEN_BUDGET,
            context_item_budget: defaults::DEFAULT_CONTEXT_ITEM_BUDGET,
        }
    }
}

fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Default task-type weight tables.
pub fn default_task_weights() -> BTreeMap<TaskType, BTreeMap<String, f64>> {
    BTreeMap::from([
        (
            TaskType::Factual,
            weights(&[("keyword", 0.7), ("dense", 0.2), ("web", 0.1)]),
        ),
        (
            TaskType::Semantic,
            weights(&[("keyword", 0.2), ("dense", 0.7), ("web", 0.1)]),
        ),
        (
            TaskType::Temporal,
            weights(&[("keyword", 0.3), ("dense", 0.2), ("web", 0.5)]),
        ),
        (
            TaskType::Comparative,
            weights(&[("keyword", 0.4), ("dense", 0.4), ("web", 0.2)]),
        ),
        (
            TaskType::MultiHop,
            weights(&[("keyword", 0.3), ("dense", 0.5), ("web", 0.2)]),
        ),
    ])
}
