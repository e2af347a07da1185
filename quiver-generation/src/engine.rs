use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use quiver_core::answer::GenerationStrategy;
use quiver_core::config::GenerationConfig;
use quiver_core::context::RankedContext;
use quiver_core::models::DegradationEvent;
use quiver_core::query::{Query, TaskType};
use quiver_core::traits::IGeneratorBackend;

use crate::selector::GeneratorSelector;
use crate::templates;

/// Result of one generation attempt chain.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// `None` after both the selected and the fallback backend failed.
    pub answer: Option<String>,
    /// The strategy actually used, fallback substitution included.
    pub strategy: GenerationStrategy,
    pub degradations: Vec<DegradationEvent>,
}

/// Selects a strategy and runs generation with the bounded retry policy:
/// one retry against the designated fallback backend, then an explicit
/// failure marker. Errors never propagate to the caller from here.
pub struct GenerationEngine {
    backends: BTreeMap<String, Arc<dyn IGeneratorBackend>>,
    selector: GeneratorSelector,
    config: GenerationConfig,
}

impl GenerationEngine {
    pub fn new(
        backends: BTreeMap<String, Arc<dyn IGeneratorBackend>>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            backends,
            selector: GeneratorSelector::new(config.clone()),
            config,
        }
    }

    pub fn select_and_generate(
        &self,
        query: &Query,
        task_type: TaskType,
        context: &RankedContext,
        prefer_fallback: bool,
    ) -> GenerationOutcome {
        let mut strategy = self.selector.select(task_type, context);
        let mut degradations = Vec::new();

        // A resource downgrade routes straight to the cheaper backend.
        if prefer_fallback && strategy.backend != self.config.fallback_backend {
            degradations.push(DegradationEvent::new(
                "generation",
                "resource pressure",
                format!("fallback backend {}", self.config.fallback_backend),
            ));
            strategy.backend = self.config.fallback_backend.clone();
        }

        let prompt = templates::render(&strategy.template, query, context);

        match self.attempt(&strategy.backend, &prompt, &strategy) {
            Ok(text) => {
                debug!(backend = %strategy.backend, "generation succeeded");
                return GenerationOutcome {
                    answer: Some(text),
                    strategy,
                    degradations,
                };
            }
            Err(reason) => {
                warn!(backend = %strategy.backend, error = %reason, "generation backend failed");
                degradations.push(DegradationEvent::new(
                    format!("generator:{}", strategy.backend),
                    reason,
                    "retrying on fallback backend",
                ));
            }
        }

        // One retry against the fallback, same rendered prompt.
        if strategy.backend != self.config.fallback_backend {
            let fallback = self.config.fallback_backend.clone();
            match self.attempt(&fallback, &prompt, &strategy) {
                Ok(text) => {
                    strategy.backend = fallback;
                    return GenerationOutcome {
                        answer: Some(text),
                        strategy,
                        degradations,
                    };
                }
                Err(reason) => {
                    warn!(backend = %fallback, error = %reason, "fallback backend failed");
                    degradations.push(DegradationEvent::new(
                        format!("generator:{fallback}"),
                        reason,
                        "no answer produced",
                    ));
                    strategy.backend = fallback;
                }
            }
        }

        GenerationOutcome {
            answer: None,
            strategy,
            degradations,
        }
    }

    fn attempt(
        &self,
        backend_name: &str,
        prompt: &str,
        strategy: &GenerationStrategy,
    ) -> Result<String, String> {
        let backend = self
            .backends
            .get(backend_name)
            .ok_or_else(|| format!("backend {backend_name} not registered"))?;
        backend
            .generate(prompt, &strategy.params)
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::answer::GenerationParams;
    use quiver_core::errors::{QuiverError, QuiverResult};

    struct EchoBackend(&'static str);

    impl IGeneratorBackend for EchoBackend {
        fn generate(&self, _prompt: &str, _params: &GenerationParams) -> QuiverResult<String> {
            Ok(self.0.to_string())
        }
    }

    struct DeadBackend;

    impl IGeneratorBackend for DeadBackend {
        fn generate(&self, _prompt: &str, _params: &GenerationParams) -> QuiverResult<String> {
            Err(QuiverError::GenerationFailed {
                backend: "dead".into(),
                reason: "out of memory".into(),
            })
        }
    }

    fn engine(
        primary: Arc<dyn IGeneratorBackend>,
        fallback: Arc<dyn IGeneratorBackend>,
    ) -> GenerationEngine {
        let mut backends: BTreeMap<String, Arc<dyn IGeneratorBackend>> = BTreeMap::new();
        backends.insert("primary".into(), primary);
        backends.insert("fallback".into(), fallback);
        GenerationEngine::new(backends, GenerationConfig::default())
    }

    #[test]
    fn primary_backend_answers() {
        let e = engine(Arc::new(EchoBackend("from primary")), Arc::new(EchoBackend("from fallback")));
        let outcome = e.select_and_generate(
            &Query::new("What is Rust?"),
            TaskType::Factual,
            &RankedContext::empty(),
            false,
        );
        assert_eq!(outcome.answer.as_deref(), Some("from primary"));
        assert_eq!(outcome.strategy.backend, "primary");
        assert!(outcome.degradations.is_empty());
    }

    #[test]
    fn dead_primary_retries_on_fallback() {
        let e = engine(Arc::new(DeadBackend), Arc::new(EchoBackend("from fallback")));
        let outcome = e.select_and_generate(
            &Query::new("What is Rust?"),
            TaskType::Factual,
            &RankedContext::empty(),
            false,
        );
        assert_eq!(outcome.answer.as_deref(), Some("from fallback"));
        assert_eq!(outcome.strategy.backend, "fallback");
        assert_eq!(outcome.degradations.len(), 1);
    }

    #[test]
    fn both_backends_dead_yields_failure_marker() {
        let e = engine(Arc::new(DeadBackend), Arc::new(DeadBackend));
        let outcome = e.select_and_generate(
            &Query::new("What is Rust?"),
            TaskType::Factual,
            &RankedContext::empty(),
            false,
        );
        assert!(outcome.answer.is_none());
        assert_eq!(outcome.degradations.len(), 2);
    }

    #[test]
    fn resource_downgrade_goes_straight_to_fallback() {
        let e = engine(Arc::new(EchoBackend("from primary")), Arc::new(EchoBackend("from fallback")));
        let outcome = e.select_and_generate(
            &Query::new("What is Rust?"),
            TaskType::Factual,
            &RankedContext::empty(),
            true,
        );
        assert_eq!(outcome.answer.as_deref(), Some("from fallback"));
        assert_eq!(outcome.strategy.backend, "fallback");
    }
}
