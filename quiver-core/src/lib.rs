//! # quiver-core
//!
//! Shared vocabulary for the quiver pipeline: request/response types, the
//! error taxonomy, per-subsystem configuration, backend traits, and the
//! text utilities the retrieval stages agree on.

pub mod answer;
pub mod candidate;
pub mod config;
pub mod context;
pub mod errors;
pub mod models;
pub mod plan;
pub mod query;
pub mod text;
pub mod traits;

pub use answer::{AnswerResult, GenerationParams, GenerationStrategy};
pub use candidate::{Candidate, FusedCandidate, FusedResult, RetrievedDoc};
pub use config::QuiverConfig;
pub use context::{ContextBudget, ContextItem, RankedContext};
pub use errors::{QuiverError, QuiverResult};
pub use models::{DegradationEvent, DowngradePlan, ResourceUsage, StageTimings};
pub use plan::RetrievalPlan;
pub use query::{Query, Subtask, TaskType};
