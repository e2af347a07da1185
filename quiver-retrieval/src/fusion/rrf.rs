//! Weighted reciprocal rank fusion.
//!
//! Each method's ranked list is normalized by rank rather than raw score,
//! because raw scores across BM25/dense/web are not comparable. A
//! candidate's fused score is `Σ_method weight[method] / (rank + k)` over
//! the methods that ranked it; a candidate missing from a list contributes
//! nothing for that method. `k` damps the spread between adjacent ranks.

use std::collections::BTreeMap;

use quiver_core::candidate::{Candidate, FusedCandidate, RetrievedDoc};
use quiver_core::text::jaccard;

/// One retriever's output with its plan weight.
#[derive(Debug, Clone)]
pub struct RankedList {
    pub retriever: String,
    pub weight: f64,
    pub docs: Vec<RetrievedDoc>,
}

struct Accum {
    candidate: Candidate,
    score: f64,
    sources: Vec<String>,
    best_rank: usize,
}

/// Fuse ranked lists into a single ordering.
///
/// Candidates sharing an id accumulate contributions across methods.
/// Candidates with near-identical content but different ids are merged
/// afterwards: the surviving entry takes the max of the fused scores and
/// the union of the provenance. Output is sorted by fused score
/// descending, ties broken by lower original rank, then id, and
/// normalized to [0, 1] by the maximum.
pub fn fuse(
    lists: &[RankedList],
    rrf_k: u32,
    dedup_similarity: f64,
    subtask_index: usize,
) -> Vec<FusedCandidate> {
    let k = rrf_k as f64;
    let mut by_id: BTreeMap<String, Accum> = BTreeMap::new();

    for list in lists {
        for (pos, doc) in list.docs.iter().enumerate() {
            let contribution = list.weight / ((pos + 1) as f64 + k);
            let entry = by_id.entry(doc.id.clone()).or_insert_with(|| Accum {
                candidate: Candidate {
                    id: doc.id.clone(),
                    retriever: list.retriever.clone(),
                    score: doc.score,
                    content: doc.content.clone(),
                    rank: Some(pos),
                },
                score: 0.0,
                sources: Vec::new(),
                best_rank: pos,
            });
            entry.score += contribution;
            if !entry.sources.iter().any(|s| s == &list.retriever) {
                entry.sources.push(list.retriever.clone());
            }
            if pos < entry.best_rank {
                entry.best_rank = pos;
                entry.candidate.retriever = list.retriever.clone();
                entry.candidate.score = doc.score;
                entry.candidate.rank = Some(pos);
            }
        }
    }

    let mut accums: Vec<Accum> = by_id.into_values().collect();
    sort_accums(&mut accums);

    // Near-duplicate content merge. Walking in score order means the
    // higher-scored entry always survives.
    let mut reps: Vec<Accum> = Vec::with_capacity(accums.len());
    for acc in accums {
        let dup = reps
            .iter()
            .position(|r| jaccard(&r.candidate.content, &acc.candidate.content) >= dedup_similarity);
        match dup {
            Some(i) => {
                let rep = &mut reps[i];
                rep.score = rep.score.max(acc.score);
                rep.best_rank = rep.best_rank.min(acc.best_rank);
                for source in acc.sources {
                    if !rep.sources.contains(&source) {
                        rep.sources.push(source);
                    }
                }
            }
            None => reps.push(acc),
        }
    }
    sort_accums(&mut reps);

    let max_score = reps.first().map(|r| r.score).unwrap_or(1.0).max(f64::EPSILON);
    reps.into_iter()
        .map(|r| FusedCandidate {
            candidate: r.candidate,
            fused_score: r.score / max_score,
            sources: r.sources,
            subtask_index,
        })
        .collect()
}

fn sort_accums(accums: &mut [Accum]) {
    accums.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.best_rank.cmp(&b.best_rank))
            .then_with(|| a.candidate.id.cmp(&b.candidate.id))
    });
}
