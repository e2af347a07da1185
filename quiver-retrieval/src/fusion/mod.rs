//! Fan-out/fan-in fusion engine: one concurrent retrieval call per planned
//! method, weighted RRF over the surviving lists, and the cross-subtask
//! merge.

pub mod rrf;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use quiver_core::candidate::{FusedCandidate, FusedResult};
use quiver_core::config::RetrievalConfig;
use quiver_core::errors::QuiverError;
use quiver_core::models::DegradationEvent;
use quiver_core::plan::RetrievalPlan;
use quiver_core::query::Subtask;
use quiver_core::text::jaccard;

use crate::registry::RetrieverRegistry;

/// Issues the retrieval calls named in a plan and fuses their ranked lists.
///
/// Failure policy: an erroring or timed-out retriever is dropped from the
/// plan for this request and the remaining weights renormalized; if every
/// retriever fails the subtask contributes an empty result and processing
/// continues. No failure here ever aborts the request.
pub struct FusionEngine {
    registry: Arc<RetrieverRegistry>,
    config: RetrievalConfig,
}

impl FusionEngine {
    pub fn new(registry: Arc<RetrieverRegistry>, config: RetrievalConfig) -> Self {
        Self { registry, config }
    }

    /// Fuse one subtask. Blocks until every planned retriever has
    /// returned, errored, or hit the per-call timeout, whichever first.
    pub async fn fuse(
        &self,
        subtask: &Subtask,
        plan: &RetrievalPlan,
    ) -> (FusedResult, Vec<DegradationEvent>) {
        let mut degradations = Vec::new();
        if plan.is_empty() {
            return (FusedResult::empty(), degradations);
        }

        let timeout = Duration::from_millis(self.config.retrieval_timeout_ms);
        let mut set = JoinSet::new();

        for (name, weight) in &plan.weights {
            let Some(backend) = self.registry.get(name) else {
                continue;
            };
            let name = name.clone();
            let weight = *weight;
            let query = subtask.text.clone();
            let top_k = self.config.top_k;

            set.spawn(async move {
                let started = Instant::now();
                let call = tokio::task::spawn_blocking({
                    let query = query.clone();
                    move || backend.retrieve(&query, top_k)
                });
                let outcome = match tokio::time::timeout(timeout, call).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(join_err)) => Err(QuiverError::RetrieverUnavailable {
                        retriever: name.clone(),
                        reason: join_err.to_string(),
                    }),
                    // The blocking call may still be running; its result
                    // is discarded and the method dropped for this request.
                    Err(_) => Err(QuiverError::Timeout {
                        operation: format!("retrieve:{name}"),
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    }),
                };
                (name, weight, outcome)
            });
        }

        let mut lists: Vec<rrf::RankedList> = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((retriever, weight, Ok(docs))) => {
                    debug!(retriever = %retriever, count = docs.len(), "retriever returned");
                    lists.push(rrf::RankedList {
                        retriever,
                        weight,
                        docs,
                    });
                }
                Ok((retriever, _weight, Err(e))) => {
                    warn!(retriever = %retriever, error = %e, "retriever dropped for this request");
                    degradations.push(DegradationEvent::new(
                        format!("retriever:{retriever}"),
                        e.to_string(),
                        "dropped from plan, weights renormalized",
                    ));
                }
                Err(join_err) => {
                    degradations.push(DegradationEvent::new(
                        "fusion",
                        join_err.to_string(),
                        "retrieval task discarded",
                    ));
                }
            }
        }

        if lists.is_empty() {
            warn!(subtask = subtask.index, "all retrievers failed, subtask contributes no evidence");
            degradations.push(DegradationEvent::new(
                "fusion",
                QuiverError::AllRetrieversFailed {
                    subtask: subtask.text.clone(),
                }
                .to_string(),
                "empty fused result",
            ));
            return (FusedResult::empty(), degradations);
        }

        // Renormalize surviving weights to sum to 1.
        let total: f64 = lists.iter().map(|l| l.weight).sum();
        if total > f64::EPSILON {
            for list in &mut lists {
                list.weight /= total;
            }
        }

        // Completion order is nondeterministic; fusion input order is not.
        lists.sort_by(|a, b| a.retriever.cmp(&b.retriever));

        let candidates = rrf::fuse(
            &lists,
            self.config.rrf_k,
            self.config.dedup_similarity,
            subtask.index,
        );
        (FusedResult { candidates }, degradations)
    }

    /// Merge per-subtask results into one ranked list for the query.
    pub fn merge(&self, results: Vec<FusedResult>) -> FusedResult {
        merge_results(results, self.config.dedup_similarity)
    }
}

/// Cross-subtask merge: concatenate in subtask order, deduplicate, and
/// re-sort globally by fused score. Ties go to the earlier subtask so
/// decomposed coverage stays broad instead of one subtask dominating.
pub fn merge_results(results: Vec<FusedResult>, dedup_similarity: f64) -> FusedResult {
    let mut merged: Vec<FusedCandidate> = Vec::new();

    for result in results {
        for cand in result.candidates {
            let duplicate = merged.iter().position(|m| {
                m.candidate.id == cand.candidate.id
                    || jaccard(&m.candidate.content, &cand.candidate.content) >= dedup_similarity
            });
            match duplicate {
                Some(i) => {
                    let existing = &mut merged[i];
                    existing.fused_score = existing.fused_score.max(cand.fused_score);
                    existing.subtask_index = existing.subtask_index.min(cand.subtask_index);
                    for source in cand.sources {
                        if !existing.sources.contains(&source) {
                            existing.sources.push(source);
                        }
                    }
                }
                None => merged.push(cand),
            }
        }
    }

    merged.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.subtask_index.cmp(&b.subtask_index))
            .then_with(|| {
                a.candidate
                    .rank
                    .unwrap_or(usize::MAX)
                    .cmp(&b.candidate.rank.unwrap_or(usize::MAX))
            })
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });

    FusedResult { candidates: merged }
}
