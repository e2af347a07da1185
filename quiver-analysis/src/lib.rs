//! # quiver-analysis
//!
//! First two pipeline stages: classify a raw query into a task type with a
//! complexity signal, then optionally split it into subtasks. Both stages
//! fail soft — a dead classifier backend degrades to keyword heuristics, a
//! dead decomposition backend degrades to the identity decomposition.

pub mod analyzer;
pub mod decomposer;
pub mod heuristics;

pub use analyzer::{Analysis, QueryAnalyzer};
pub use decomposer::{Decomposition, TaskDecomposer};
