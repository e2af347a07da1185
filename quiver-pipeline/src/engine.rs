use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, info};

use quiver_core::answer::{AnswerResult, GenerationParams, GenerationStrategy};
use quiver_core::candidate::FusedResult;
use quiver_core::config::QuiverConfig;
use quiver_core::context::{ContextBudget, RankedContext};
use quiver_core::errors::QuiverResult;
use quiver_core::models::{DegradationEvent, DowngradePlan, StageTimings};
use quiver_core::query::{Query, TaskType};
use quiver_core::traits::{
    IGeneratorBackend, IQueryClassifier, IRerankerBackend, IResourceProbe,
};

use quiver_analysis::{QueryAnalyzer, TaskDecomposer};
use quiver_generation::{GenerationEngine, GenerationOutcome};
use quiver_resource::{downgrade_plan, ResourceMonitor};
use quiver_retrieval::{ContextReranker, FusionEngine, RetrieverRegistry, StrategyPlanner};
use quiver_tokens::TokenCounter;

use crate::cache::{self, AnswerCache};

/// The external collaborators a pipeline is wired to.
pub struct PipelineBackends {
    pub classifier: Arc<dyn IQueryClassifier>,
    pub retrievers: RetrieverRegistry,
    pub reranker: Option<Arc<dyn IRerankerBackend>>,
    pub generators: BTreeMap<String, Arc<dyn IGeneratorBackend>>,
    pub resource_probe: Arc<dyn IResourceProbe>,
}

/// Per-request orchestration over the configured stages. All state here is
/// read-only after construction; requests share nothing but it and the
/// resource snapshot.
pub struct AdaptivePipeline {
    config: QuiverConfig,
    analyzer: QueryAnalyzer,
    decomposer: TaskDecomposer,
    planner: StrategyPlanner,
    registry: Arc<RetrieverRegistry>,
    fusion: Arc<FusionEngine>,
    reranker: Arc<ContextReranker>,
    generation: Arc<GenerationEngine>,
    monitor: Arc<ResourceMonitor>,
    cache: Option<AnswerCache>,
}

impl AdaptivePipeline {
    pub fn new(config: QuiverConfig, backends: PipelineBackends) -> Self {
        let tokens = Arc::new(TokenCounter::default());
        let registry = Arc::new(backends.retrievers);

        let analyzer = QueryAnalyzer::new(Arc::clone(&backends.classifier));
        let decomposer = TaskDecomposer::new(
            backends.classifier,
            Arc::clone(&tokens),
            config.analysis.clone(),
        );
        let planner = StrategyPlanner::new(config.retrieval.clone());
        let fusion = Arc::new(FusionEngine::new(
            Arc::clone(&registry),
            config.retrieval.clone(),
        ));
        let reranker = Arc::new(ContextReranker::new(
            backends.reranker,
            tokens,
            config.retrieval.clone(),
        ));
        let generation = Arc::new(GenerationEngine::new(
            backends.generators,
            config.generation.clone(),
        ));
        let monitor = Arc::new(ResourceMonitor::new(backends.resource_probe));
        let cache = config.cache.enabled.then(|| AnswerCache::new(config.cache));

        Self {
            config,
            analyzer,
            decomposer,
            planner,
            registry,
            fusion,
            reranker,
            generation,
            monitor,
            cache,
        }
    }

    /// Start the background resource refresher.
    pub fn start_monitoring(&self) {
        self.monitor
            .start(Duration::from_secs(self.config.resource.refresh_interval_secs));
    }

    pub fn stop_monitoring(&self) {
        self.monitor.stop();
    }

    /// Answer cache hit rate so far, when caching is enabled.
    pub fn cache_hit_rate(&self) -> Option<f64> {
        self.cache.as_ref().map(AnswerCache::hit_rate)
    }

    /// Run one query through the full pipeline.
    ///
    /// Stage failures degrade rather than abort: the returned
    /// `AnswerResult` records every fallback taken, and `answer: None`
    /// marks the one user-visible failure (generation exhausted its
    /// fallback).
    pub async fn process(&self, query: Query) -> QuiverResult<AnswerResult> {
        let started = Instant::now();
        let mut timings = StageTimings::default();
        let mut degradations: Vec<DegradationEvent> = Vec::new();

        // One snapshot read per request; stages only see the derived plan.
        let downgrade = downgrade_plan(&self.monitor.snapshot(), &self.config.resource);
        if !downgrade.is_none() {
            info!(query_id = %query.id, "resource downgrade active for this request");
        }

        // Stage 1: analyze.
        let stage = Instant::now();
        let analysis = self.analyzer.analyze(&query);
        timings.analyze_ms = elapsed_ms(stage);
        if analysis.degraded {
            degradations.push(DegradationEvent::new(
                "analyzer",
                "classifier backend unavailable",
                "heuristic classification",
            ));
        }
        debug!(
            query_id = %query.id,
            task_type = analysis.task_type.as_str(),
            complexity = analysis.complexity,
            "query analyzed"
        );

        let signature = self.strategy_signature(analysis.task_type, &downgrade);
        let cache_key = cache::key(&query.text, &signature);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&cache_key) {
                debug!(query_id = %query.id, "answer served from cache");
                return Ok(hit);
            }
        }

        // Stage 2: decompose.
        let stage = Instant::now();
        let decomposition = self.decomposer.decompose(&query, &analysis);
        timings.decompose_ms = elapsed_ms(stage);
        if decomposition.degraded {
            degradations.push(DegradationEvent::new(
                "decomposer",
                "decomposition backend unavailable",
                "identity or rule-based decomposition",
            ));
        }

        // Stages 3+4: plan and fuse, concurrent across subtasks. Subtasks
        // are independent until the merge, which is the sync point.
        let stage = Instant::now();
        let subtask_count = decomposition.subtasks.len();
        let mut set = JoinSet::new();
        for subtask in decomposition.subtasks {
            let plan = self.planner.plan(
                &subtask,
                analysis.entities.len(),
                &downgrade,
                &self.registry,
            );
            let fusion = Arc::clone(&self.fusion);
            set.spawn(async move {
                let index = subtask.index;
                let (result, degradations) = fusion.fuse(&subtask, &plan).await;
                (index, result, degradations)
            });
        }

        let mut per_subtask: Vec<Option<FusedResult>> = vec![None; subtask_count];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result, mut subtask_degradations)) => {
                    per_subtask[index] = Some(result);
                    degradations.append(&mut subtask_degradations);
                }
                Err(join_err) => degradations.push(DegradationEvent::new(
                    "pipeline",
                    join_err.to_string(),
                    "subtask discarded",
                )),
            }
        }
        let fused = self
            .fusion
            .merge(per_subtask.into_iter().flatten().collect());
        timings.retrieve_ms = elapsed_ms(stage);

        // Stage 5: rerank under the (possibly downgraded) global budget.
        let stage = Instant::now();
        let budget = self.scaled_budget(&downgrade);
        let (context, rerank_degradation) = {
            let reranker = Arc::clone(&self.reranker);
            let query_text = query.text.clone();
            match tokio::task::spawn_blocking(move || reranker.rerank(&query_text, &fused, &budget))
                .await
            {
                Ok(out) => out,
                Err(join_err) => (
                    RankedContext::empty(),
                    Some(DegradationEvent::new(
                        "reranker",
                        join_err.to_string(),
                        "empty context",
                    )),
                ),
            }
        };
        degradations.extend(rerank_degradation);
        timings.rerank_ms = elapsed_ms(stage);

        // Stage 6: strategy selection + generation with bounded fallback.
        let stage = Instant::now();
        let outcome = {
            let generation = Arc::clone(&self.generation);
            let query = query.clone();
            let context = context.clone();
            let task_type = analysis.task_type;
            let prefer_fallback = downgrade.prefer_fallback_generator;
            match tokio::task::spawn_blocking(move || {
                generation.select_and_generate(&query, task_type, &context, prefer_fallback)
            })
            .await
            {
                Ok(outcome) => outcome,
                Err(join_err) => GenerationOutcome {
                    answer: None,
                    strategy: self.default_strategy(),
                    degradations: vec![DegradationEvent::new(
                        "generation",
                        join_err.to_string(),
                        "no answer produced",
                    )],
                },
            }
        };
        degradations.extend(outcome.degradations);
        timings.generate_ms = elapsed_ms(stage);
        timings.total_ms = started.elapsed().as_millis() as u64;

        let result = AnswerResult {
            answer: outcome.answer,
            context,
            strategy: outcome.strategy,
            timings,
            degradations,
        };

        if let Some(cache) = &self.cache {
            if !result.failed() {
                cache.insert(cache_key, result.clone());
            }
        }
        Ok(result)
    }

    /// Signature of everything that changes what a cached answer would be.
    fn strategy_signature(&self, task_type: TaskType, downgrade: &DowngradePlan) -> String {
        let retrievers = self.config.retrieval.enabled_retrievers.join("+");
        let level = if downgrade.is_none() {
            "full"
        } else if downgrade.prefer_fallback_generator {
            "critical"
        } else {
            "reduced"
        };
        format!("{}|{retrievers}|{level}", task_type.as_str())
    }

    fn scaled_budget(&self, downgrade: &DowngradePlan) -> ContextBudget {
        let scale = downgrade.budget_scale.clamp(0.1, 1.0);
        ContextBudget {
            max_tokens: (self.config.retrieval.context_token_budget as f64 * scale) as usize,
            max_items: ((self.config.retrieval.context_item_budget as f64 * scale).ceil()
                as usize)
                .max(1),
        }
    }

    fn default_strategy(&self) -> GenerationStrategy {
        let route = &self.config.generation.default_route;
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

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
