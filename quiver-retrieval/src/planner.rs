use tracing::debug;

use quiver_core::config::RetrievalConfig;
use quiver_core::models::DowngradePlan;
use quiver_core::plan::RetrievalPlan;
use quiver_core::query::Subtask;

use crate::registry::RetrieverRegistry;

/// Produces a weighted retriever selection per subtask from the
/// task-type weight tables.
///
/// A retriever makes it into a plan only if it is enabled in config,
/// actually registered, and survives the resource downgrade cap. Weights
/// are renormalized to sum to 1 after any exclusion.
pub struct StrategyPlanner {
    config: RetrievalConfig,
}

impl StrategyPlanner {
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    pub fn plan(
        &self,
        subtask: &Subtask,
        entity_count: usize,
        downgrade: &DowngradePlan,
        registry: &RetrieverRegistry,
    ) -> RetrievalPlan {
        let eligible: Vec<&str> = self
            .config
            .enabled_retrievers
            .iter()
            .map(String::as_str)
            .filter(|name| registry.contains(name))
            .collect();

        if eligible.is_empty() {
            return RetrievalPlan::default();
        }

        // Table lookup by task type; unknown types get an even split.
        let mut plan = RetrievalPlan::default();
        match self.config.task_weights.get(&subtask.task_type) {
            Some(table) => {
                for name in &eligible {
                    if let Some(&w) = table.get(*name) {
                        if w > 0.0 {
                            plan.weights.insert(name.to_string(), w);
                        }
                    }
                }
            }
            None => {
                let even = 1.0 / eligible.len() as f64;
                for name in &eligible {
                    plan.weights.insert(name.to_string(), even);
                }
            }
        }

        // A table that names none of the eligible retrievers also falls
        // back to the even split.
        if plan.is_empty() {
            let even = 1.0 / eligible.len() as f64;
            for name in &eligible {
                plan.weights.insert(name.to_string(), even);
            }
        }

        // Entity-heavy subtasks lean toward exact keyword matching.
        if entity_count > 3 {
            if let Some(w) = plan.weights.get_mut("keyword") {
                *w = (*w + 0.1).min(0.8);
            }
        }

        if let Some(cap) = downgrade.max_retrievers {
            self.apply_cap(&mut plan, cap);
        }

        plan.renormalize();
        debug!(
            subtask = subtask.index,
            task_type = subtask.task_type.as_str(),
            retrievers = plan.len(),
            "retrieval plan built"
        );
        plan
    }

    /// Keep the `cap` highest-weighted retrievers. Ties resolve by name so
    /// the cut is deterministic.
    fn apply_cap(&self, plan: &mut RetrievalPlan, cap: usize) {
        if cap == 0 || plan.len() <= cap {
            return;
        }
        let mut ranked: Vec<(String, f64)> = plan
            .weights
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(cap);
        plan.weights = ranked.into_iter().collect();
    }
}
