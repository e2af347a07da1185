//! Property tests for the fusion and packing invariants.

use std::sync::{Arc, OnceLock};

use proptest::prelude::*;

use quiver_core::candidate::{Candidate, FusedCandidate, FusedResult, RetrievedDoc};
use quiver_core::config::RetrievalConfig;
use quiver_core::context::ContextBudget;
use quiver_retrieval::fusion::rrf::{fuse, RankedList};
use quiver_retrieval::fusion::merge_results;
use quiver_retrieval::rerank::ContextReranker;
use quiver_tokens::TokenCounter;

fn shared_counter() -> Arc<TokenCounter> {
    static COUNTER: OnceLock<Arc<TokenCounter>> = OnceLock::new();
    COUNTER.get_or_init(|| Arc::new(TokenCounter::default())).clone()
}

fn doc_strategy() -> impl Strategy<Value = RetrievedDoc> {
    ("[a-d][0-9]", 0.0f64..10.0, "[a-z]{3,8}( [a-z]{3,8}){2,6}").prop_map(
        |(id, score, content)| RetrievedDoc { id, score, content },
    )
}

fn list_strategy(retriever: &'static str) -> impl Strategy<Value = RankedList> {
    (0.05f64..1.0, prop::collection::vec(doc_strategy(), 0..8)).prop_map(move |(weight, docs)| {
        // A retriever never returns the same id twice.
        let mut seen = std::collections::HashSet::new();
        let docs = docs.into_iter().filter(|d| seen.insert(d.id.clone())).collect();
        RankedList {
            retriever: retriever.to_string(),
            weight,
            docs,
        }
    })
}

fn lists_strategy() -> impl Strategy<Value = Vec<RankedList>> {
    (
        list_strategy("keyword"),
        list_strategy("dense"),
        list_strategy("web"),
    )
        .prop_map(|(a, b, c)| vec![a, b, c])
}

proptest! {
    #[test]
    fn fusion_never_emits_duplicate_ids(lists in lists_strategy()) {
        let fused = fuse(&lists, 60, 0.95, 0);
        let mut ids: Vec<_> = fused.iter().map(|c| c.candidate.id.clone()).collect();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());
    }

    #[test]
    fn fusion_scores_are_normalized_and_descending(lists in lists_strategy()) {
        let fused = fuse(&lists, 60, 0.95, 0);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].fused_score >= pair[1].fused_score);
        }
        for c in &fused {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&c.fused_score));
        }
    }

    #[test]
    fn fusion_is_deterministic_across_runs(lists in lists_strategy()) {
        let first = fuse(&lists, 60, 0.95, 0);
        let second = fuse(&lists, 60, 0.95, 0);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.candidate.id, &b.candidate.id);
            prop_assert!((a.fused_score - b.fused_score).abs() < 1e-12);
        }
    }

    #[test]
    fn merge_preserves_no_duplicate_invariant(
        lists_a in lists_strategy(),
        lists_b in lists_strategy(),
    ) {
        let a = FusedResult { candidates: fuse(&lists_a, 60, 0.95, 0) };
        let b = FusedResult { candidates: fuse(&lists_b, 60, 0.95, 1) };
        let merged = merge_results(vec![a, b], 0.95);
        let mut ids: Vec<_> = merged.candidates.iter().map(|c| c.candidate.id.clone()).collect();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());
        for pair in merged.candidates.windows(2) {
            prop_assert!(pair[0].fused_score >= pair[1].fused_score);
        }
    }
}

fn fused_input_strategy() -> impl Strategy<Value = FusedResult> {
    prop::collection::vec(
        ("[a-z]{2}[0-9]{2}", 0.0f64..1.0, "[a-z]{3,8}( [a-z]{3,8}){2,8}"),
        0..15,
    )
    .prop_map(|entries| {
        let mut seen = std::collections::HashSet::new();
        let mut candidates: Vec<FusedCandidate> = entries
            .into_iter()
            .filter(|(id, _, _)| seen.insert(id.clone()))
            .enumerate()
            .map(|(rank, (id, score, content))| FusedCandidate {
                candidate: Candidate {
                    id,
                    retriever: "keyword".into(),
                    score,
                    content,
                    rank: Some(rank),
                },
                fused_score: score,
                sources: vec!["keyword".into()],
                subtask_index: 0,
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        FusedResult { candidates }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn packed_context_respects_budget_and_redundancy(
        fused in fused_input_strategy(),
        max_items in 1usize..6,
        max_tokens in 10usize..200,
    ) {
        let config = RetrievalConfig::default();
        let threshold = config.redundancy_threshold;
        let reranker = ContextReranker::new(None, shared_counter(), config);
        let budget = ContextBudget { max_tokens, max_items };
        let (ctx, _) = reranker.rerank("query", &fused, &budget);

        prop_assert!(ctx.len() <= max_items);
        prop_assert!(ctx.token_count <= max_tokens);
        for i in 0..ctx.items.len() {
            for j in (i + 1)..ctx.items.len() {
                let sim = quiver_core::text::jaccard(
                    &ctx.items[i].candidate.content,
                    &ctx.items[j].candidate.content,
                );
                prop_assert!(sim < threshold);
            }
        }
    }

    #[test]
    fn rerank_twice_gives_identical_context(fused in fused_input_strategy()) {
        let reranker = ContextReranker::new(None, shared_counter(), RetrievalConfig::default());
        let budget = ContextBudget { max_tokens: 150, max_items: 5 };
        let (first, _) = reranker.rerank("query", &fused, &budget);
        let (second, _) = reranker.rerank("query", &fused, &budget);
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.items.iter().zip(second.items.iter()) {
            prop_assert_eq!(&a.candidate.id, &b.candidate.id);
            prop_assert!((a.final_score - b.final_score).abs() < 1e-12);
        }
    }
}
