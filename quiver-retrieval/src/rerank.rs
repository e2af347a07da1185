//! Second-stage precision pass over the fused shortlist.
//!
//! Blends the external rerank score with the fused score instead of
//! replacing it, then applies a greedy redundancy filter while packing
//! into the context budget. The filter is a maximal-marginal-relevance
//! style greedy accept, not an optimal diverse-subset solver; that
//! approximation is deliberate.

use std::sync::Arc;

use tracing::warn;

use quiver_core::candidate::{FusedCandidate, FusedResult};
use quiver_core::config::RetrievalConfig;
use quiver_core::context::{ContextBudget, ContextItem, RankedContext};
use quiver_core::models::DegradationEvent;
use quiver_core::text::jaccard;
use quiver_core::traits::IRerankerBackend;
use quiver_tokens::TokenCounter;

/// Candidate ordering carried between scoring and packing.
type Scored = (FusedCandidate, f64, Option<f64>);

/// Rescales and reorders the fused list, enforces the redundancy
/// constraint, and truncates to the context budget.
///
/// If the reranking backend fails, the fused order is used directly
/// (degraded but never empty unless the input was empty).
pub struct ContextReranker {
    backend: Option<Arc<dyn IRerankerBackend>>,
    tokens: Arc<TokenCounter>,
    config: RetrievalConfig,
}

impl ContextReranker {
    pub fn new(
        backend: Option<Arc<dyn IRerankerBackend>>,
        tokens: Arc<TokenCounter>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            backend,
            tokens,
            config,
        }
    }

    pub fn rerank(
        &self,
        query_text: &str,
        fused: &FusedResult,
        budget: &ContextBudget,
    ) -> (RankedContext, Option<DegradationEvent>) {
        if fused.is_empty() {
            return (RankedContext::empty(), None);
        }

        let (ordered, degradation) = self.score_shortlist(query_text, fused);
        let mut context = self.pack(ordered, budget);
        context.degraded = degradation.is_some();
        (context, degradation)
    }

    /// Apply the external rerank score to the top of the fused list.
    /// Candidates beyond the rerank cap are appended unchanged, in fused
    /// order. No backend configured means the fused order passes through
    /// as-is (a deliberate configuration, not a degradation).
    fn score_shortlist(
        &self,
        query_text: &str,
        fused: &FusedResult,
    ) -> (Vec<Scored>, Option<DegradationEvent>) {
        let head = self.config.rerank_top_k.min(fused.len());
        let fused_order = || {
            fused
                .candidates
                .iter()
                .map(|c| (c.clone(), c.fused_score, None))
                .collect::<Vec<Scored>>()
        };

        if !self.config.rerank_enabled {
            return (fused_order(), None);
        }
        let Some(backend) = &self.backend else {
            return (fused_order(), None);
        };

        let contents: Vec<&str> = fused.candidates[..head]
            .iter()
            .map(|c| c.candidate.content.as_str())
            .collect();

        let scores = match backend.score(query_text, &contents) {
            Ok(scores) if scores.len() == contents.len() => scores,
            Ok(scores) => {
                warn!(
                    expected = contents.len(),
                    got = scores.len(),
                    "reranker returned misaligned scores, using fused order"
                );
                return (
                    fused_order(),
                    Some(DegradationEvent::new(
                        "reranker",
                        "misaligned score vector",
                        "fused order",
                    )),
                );
            }
            Err(e) => {
                warn!(error = %e, "reranker failed, using fused order");
                return (
                    fused_order(),
                    Some(DegradationEvent::new("reranker", e.to_string(), "fused order")),
                );
            }
        };

        let alpha = self.config.rerank_alpha;
        let mut blended: Vec<Scored> = fused.candidates[..head]
            .iter()
            .zip(scores)
            .map(|(c, rerank)| {
                let final_score = alpha * rerank + (1.0 - alpha) * c.fused_score;
                (c.clone(), final_score, Some(rerank))
            })
            .collect();
        blended.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    b.0.fused_score
                        .partial_cmp(&a.0.fused_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.0.candidate.id.cmp(&b.0.candidate.id))
        });
        blended.extend(
            fused.candidates[head..]
                .iter()
                .map(|c| (c.clone(), c.fused_score, None)),
        );
        (blended, None)
    }

    /// Greedy accept under the redundancy constraint until either budget
    /// bound is reached. A rejected near-duplicate does not stop the
    /// scan; an item that would exceed the token budget does.
    fn pack(&self, ordered: Vec<Scored>, budget: &ContextBudget) -> RankedContext {
        let mut items: Vec<ContextItem> = Vec::new();
        let mut token_count = 0usize;
        let mut pair_sim_sum = 0.0;
        let mut pair_count = 0usize;

        for (fc, final_score, rerank_score) in ordered {
            if items.len() >= budget.max_items {
                break;
            }
            let item_tokens = self.tokens.count_cached(&fc.candidate.content);
            if token_count + item_tokens > budget.max_tokens {
                break;
            }

            let sims: Vec<f64> = items
                .iter()
                .map(|item| jaccard(&item.candidate.content, &fc.candidate.content))
                .collect();
            if sims
                .iter()
                .any(|&s| s >= self.config.redundancy_threshold)
            {
                continue;
            }

            let max_similarity = sims.iter().cloned().fold(0.0, f64::max);
            pair_sim_sum += sims.iter().sum::<f64>();
            pair_count += sims.len();
            token_count += item_tokens;
            items.push(ContextItem {
                candidate: fc.candidate,
                final_score,
                rerank_score,
                max_similarity,
            });
        }

        let diversity_score = if pair_count == 0 {
            1.0
        } else {
            1.0 - pair_sim_sum / pair_count as f64
        };

        RankedContext {
            items,
            diversity_score,
            token_count,
            degraded: false,
        }
    }
}
