//! # quiver-retrieval
//!
//! The middle of the pipeline: per-subtask retrieval planning, concurrent
//! multi-retriever fan-out fused with weighted reciprocal rank fusion,
//! and a rerank pass with a greedy redundancy filter.
//!
//! ## Architecture
//!
//! ```text
//! StrategyPlanner
//! ├── task-type weight tables (config, data not code)
//! ├── enabled/registered intersection
//! └── resource downgrade + renormalization
//! FusionEngine
//! ├── fan-out (tokio JoinSet, per-call timeout)
//! ├── weighted RRF (rank-based normalization)
//! ├── dedup (id + near-identical content)
//! └── cross-subtask merge (earlier subtask wins ties)
//! ContextReranker
//! ├── secondary relevance scoring (external backend)
//! ├── alpha blend with fused scores
//! ├── greedy redundancy filter (MMR-style)
//! └── token/count budget truncation
//! ```

pub mod fusion;
pub mod planner;
pub mod registry;
pub mod rerank;

pub use fusion::FusionEngine;
pub use planner::StrategyPlanner;
pub use registry::RetrieverRegistry;
pub use rerank::ContextReranker;
