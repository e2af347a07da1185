//! # quiver-pipeline
//!
//! Ties the stages together per request:
//!
//! ```text
//! Query → Analyzer → Decomposer → [per subtask: Planner → FusionEngine]
//!       → merge → ContextReranker → GenerationEngine → AnswerResult
//! ```
//!
//! The resource monitor wraps every stage: the latest snapshot is read
//! once per request and the derived downgrade plan can shrink the
//! retrieval plan, the context budget, and the generator choice before
//! each stage starts. No state is shared between concurrent requests
//! except the read-only configuration and that snapshot.

pub mod cache;
pub mod engine;

pub use cache::AnswerCache;
pub use engine::{AdaptivePipeline, PipelineBackends};
