use serde::{Deserialize, Serialize};

use super::defaults;

/// Query analysis and task decomposition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Module switch: disabling forces the identity decomposition.
    pub decomposition_enabled: bool,
    /// Complexity at or above which decomposition is attempted.
    pub decomposition_threshold: f64,
    /// Queries shorter than this (estimated tokens) are never decomposed.
    pub min_decompose_tokens: usize,
    /// Hard cap on the number of subtasks per query.
    pub max_subtasks: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            decomposition_enabled: defaults::DEFAULT_DECOMPOSITION_ENABLED,
            decomposition_threshold: defaults::DEFAULT_DECOMPOSITION_THRESHOLD,
            min_decompose_tokens: defaults::DEFAULT_MIN_DECOMPOSE_TOKENS,
            max_subtasks: defaults::DEFAULT_MAX_SUBTASKS,
        }
    }
}
