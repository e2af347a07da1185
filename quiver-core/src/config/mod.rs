//! Per-subsystem configuration, loaded once at startup and immutable
//! afterwards. All structs deserialize with `#[serde(default)]` so a
//! partial TOML file overrides only what it names.

pub mod analysis_config;
pub mod cache_config;
pub mod defaults;
pub mod generation_config;
pub mod resource_config;
pub mod retrieval_config;

pub use analysis_config::AnalysisConfig;
pub use cache_config::CacheConfig;
pub use generation_config::{GenerationConfig, GenerationRoute};
pub use resource_config::ResourceConfig;
pub use retrieval_config::RetrievalConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{QuiverError, QuiverResult};

/// Process-wide configuration aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiverConfig {
    pub analysis: AnalysisConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub resource: ResourceConfig,
    pub cache: CacheConfig,
}

impl QuiverConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> QuiverResult<Self> {
        toml::from_str(raw).map_err(|e| QuiverError::Config {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TaskType;

    #[test]
    fn defaults_are_consistent() {
        let config = QuiverConfig::default();
        assert!(config.analysis.decomposition_threshold > 0.0);
        assert_eq!(config.retrieval.rrf_k, 60);
        assert!((config.retrieval.rerank_alpha - 0.7).abs() < 1e-9);
        assert!((config.retrieval.redundancy_threshold - 0.85).abs() < 1e-9);
        // Factual table matches the documented defaults.
        let factual = &config.retrieval.task_weights[&TaskType::Factual];
        assert!((factual["keyword"] - 0.7).abs() < 1e-9);
        assert!((factual["dense"] - 0.2).abs() < 1e-9);
        assert!((factual["web"] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = QuiverConfig::from_toml_str(
            r#"
            [retrieval]
            rrf_k = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.rrf_k, 10);
        assert_eq!(config.analysis.max_subtasks, 3);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = QuiverConfig::from_toml_str("not = [valid").unwrap_err();
        assert!(matches!(err, QuiverError::Config { .. }));
    }
}
