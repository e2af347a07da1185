use quiver_core::answer::{GenerationParams, GenerationStrategy};
use quiver_core::config::GenerationConfig;
use quiver_core::context::RankedContext;
use quiver_core::query::TaskType;

/// Coarse context size used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextBucket {
    Empty,
    Small,
    Large,
}

impl ContextBucket {
    pub fn of(context: &RankedContext, small_max_items: usize) -> Self {
        if context.is_empty() {
            ContextBucket::Empty
        } else if context.len() <= small_max_items {
            ContextBucket::Small
        } else {
            ContextBucket::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextBucket::Empty => "empty",
            ContextBucket::Small => "small",
            ContextBucket::Large => "large",
        }
    }
}

/// Routes (task type × context bucket) to a generation strategy via the
/// configured lookup table. Unmapped combinations get the default route,
/// so new task types are additive configuration.
pub struct GeneratorSelector {
    config: GenerationConfig,
}

impl GeneratorSelector {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn select(&self, task_type: TaskType, context: &RankedContext) -> GenerationStrategy {
        let bucket = ContextBucket::of(context, self.config.small_context_max_items);
        let key = format!("{}:{}", task_type.as_str(), bucket.as_str());
        let route = self
            .config
            .routes
            .get(&key)
            .unwrap_or(&self.config.default_route);
        GenerationStrategy {
            template: route.template.clone(),
            backend: route.backend.clone(),
            params: GenerationParams {
                max_tokens: route.max_tokens,
                temperature: route.temperature,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::candidate::Candidate;
    use quiver_core::context::ContextItem;

    fn context_with(n: usize) -> RankedContext {
        RankedContext {
            items: (0..n)
                .map(|i| ContextItem {
                    candidate: Candidate {
                        id: format!("c{i}"),
                        retriever: "keyword".into(),
                        score: 1.0,
                        content: format!("evidence {i}"),
                        rank: Some(i),
                    },
                    final_score: 1.0,
                    rerank_score: None,
                    max_similarity: 0.0,
                })
                .collect(),
            diversity_score: 1.0,
            token_count: n * 3,
            degraded: false,
        }
    }

    #[test]
    fn factual_small_routes_to_definition_template() {
        let selector = GeneratorSelector::new(GenerationConfig::default());
        let strategy = selector.select(TaskType::Factual, &context_with(2));
        assert_eq!(strategy.template, "definition");
    }

    #[test]
    fn unmapped_combination_uses_default_route() {
        let selector = GeneratorSelector::new(GenerationConfig::default());
        let strategy = selector.select(TaskType::Other, &context_with(2));
        assert_eq!(strategy.template, "grounded");
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(ContextBucket::of(&context_with(0), 3), ContextBucket::Empty);
        assert_eq!(ContextBucket::of(&context_with(3), 3), ContextBucket::Small);
        assert_eq!(ContextBucket::of(&context_with(4), 3), ContextBucket::Large);
    }
}
