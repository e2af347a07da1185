use serde::{Deserialize, Serialize};

use crate::context::RankedContext;
use crate::models::{DegradationEvent, StageTimings};

/// Decoding parameters passed to a generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: usize,
    pub temperature: f64,
}

/// The generation path chosen for one request: prompt template, backend,
/// and decoding parameters. Selected once from task type and context size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStrategy {
    pub template: String,
    pub backend: String,
    pub params: GenerationParams,
}

/// Final pipeline output.
///
/// `answer: None` is the explicit failure marker for "no answer produced"
/// after the fallback backend was also exhausted; callers can render it
/// distinctly from an answered request. The context, timings, and recorded
/// degradations are attached either way so the path actually taken can be
/// asserted on, not just the final text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: Option<String>,
    pub context: RankedContext,
    /// The strategy actually used, which differs from the first choice
    /// when a downgrade or fallback occurred.
    pub strategy: GenerationStrategy,
    pub timings: StageTimings,
    pub degradations: Vec<DegradationEvent>,
}

impl AnswerResult {
    pub fn failed(&self) -> bool {
        self.answer.is_none()
    }
}
