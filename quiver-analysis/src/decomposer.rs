use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use quiver_core::config::AnalysisConfig;
use quiver_core::query::{Query, Subtask, TaskType};
use quiver_core::text::normalize;
use quiver_core::traits::IQueryClassifier;
use quiver_tokens::TokenCounter;

use crate::analyzer::Analysis;
use crate::heuristics;

/// Decomposition output. Length is always ≥ 1.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub subtasks: Vec<Subtask>,
    /// Set when the decomposition backend failed and a fallback was used.
    pub degraded: bool,
}

/// Splits a complex query into an ordered list of subtask queries.
///
/// Decomposition only triggers when the complexity signal clears the
/// configured threshold AND the query is long enough to be worth it; the
/// common case is the identity decomposition, which is O(1).
pub struct TaskDecomposer {
    backend: Arc<dyn IQueryClassifier>,
    tokens: Arc<TokenCounter>,
    config: AnalysisConfig,
}

impl TaskDecomposer {
    pub fn new(
        backend: Arc<dyn IQueryClassifier>,
        tokens: Arc<TokenCounter>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            backend,
            tokens,
            config,
        }
    }

    pub fn decompose(&self, query: &Query, analysis: &Analysis) -> Decomposition {
        if !self.config.decomposition_enabled
            || analysis.complexity < self.config.decomposition_threshold
            || self.tokens.count_cached(&query.text) <= self.config.min_decompose_tokens
        {
            return Decomposition {
                subtasks: vec![self.identity(query, analysis)],
                degraded: false,
            };
        }

        match self.backend.decompose(&query.text) {
            Ok(parts) => {
                let subtasks = self.build_subtasks(query, parts);
                if subtasks.is_empty() {
                    let fallback = self.rule_based(query);
                    let subtasks = self.build_subtasks(query, fallback);
                    return Decomposition {
                        subtasks: self.or_identity(subtasks, query, analysis),
                        degraded: false,
                    };
                }
                debug!(query_id = %query.id, count = subtasks.len(), "query decomposed");
                Decomposition {
                    subtasks,
                    degraded: false,
                }
            }
            Err(e) => {
                warn!(query_id = %query.id, error = %e, "decomposition failed, using fallback");
                let fallback = self.rule_based(query);
                let subtasks = self.build_subtasks(query, fallback);
                Decomposition {
                    subtasks: self.or_identity(subtasks, query, analysis),
                    degraded: true,
                }
            }
        }
    }

    fn identity(&self, query: &Query, analysis: &Analysis) -> Subtask {
        Subtask {
            text: query.text.clone(),
            parent_id: query.id,
            index: 0,
            task_type: analysis.task_type,
        }
    }

    fn or_identity(
        &self,
        subtasks: Vec<Subtask>,
        query: &Query,
        analysis: &Analysis,
    ) -> Vec<Subtask> {
        if subtasks.is_empty() {
            vec![self.identity(query, analysis)]
        } else {
            subtasks
        }
    }

    /// Filter, deduplicate, cap, and classify raw sub-query strings.
    /// Order is preserved; it becomes the deterministic merge order.
    fn build_subtasks(&self, query: &Query, parts: Vec<String>) -> Vec<Subtask> {
        let mut seen = std::collections::HashSet::new();
        parts
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| p.len() > 5)
            .filter(|p| seen.insert(normalize(p)))
            .take(self.config.max_subtasks)
            .enumerate()
            .map(|(index, text)| {
                let entities = heuristics::extract_entities(&text);
                Subtask {
                    task_type: heuristics::classify(&text, &entities),
                    text,
                    parent_id: query.id,
                    index,
                }
            })
            .collect()
    }

    /// Rule-based fallback for the decomposition shapes we can recognize
    /// without a model: explicit comparisons and "which came first".
    fn rule_based(&self, query: &Query) -> Vec<String> {
        static COMPARE: OnceLock<Regex> = OnceLock::new();
        static VS: OnceLock<Regex> = OnceLock::new();
        static FIRST_OR: OnceLock<Regex> = OnceLock::new();

        let compare = COMPARE.get_or_init(|| {
            Regex::new(r"(?i)compare\s+(.+?)\s+(?:and|with|to)\s+(.+?)[?.]?$").unwrap()
        });
        let vs = VS
            .get_or_init(|| Regex::new(r"(?i)^(.+?)\s+(?:vs\.?|versus)\s+(.+?)[?.]?$").unwrap());
        let first_or = FIRST_OR.get_or_init(|| {
            Regex::new(r"(?i)first[,:]?\s+(.+?)\s+or\s+(.+?)[?.]?$").unwrap()
        });

        if let Some(caps) = compare.captures(&query.text).or_else(|| vs.captures(&query.text)) {
            return vec![
                format!("What is {}?", caps[1].trim()),
                format!("What is {}?", caps[2].trim()),
            ];
        }
        if let Some(caps) = first_or.captures(&query.text) {
            return vec![
                format!("When was {} founded?", caps[1].trim()),
                format!("When was {} founded?", caps[2].trim()),
            ];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::errors::{QuiverError, QuiverResult};

    struct SplittingBackend(Vec<String>);

    impl IQueryClassifier for SplittingBackend {
        fn classify(&self, text: &str) -> QuiverResult<TaskType> {
            Ok(heuristics::classify(text, &[]))
        }
        fn decompose(&self, _text: &str) -> QuiverResult<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct DeadBackend;

    impl IQueryClassifier for DeadBackend {
        fn classify(&self, _text: &str) -> QuiverResult<TaskType> {
            Err(QuiverError::ClassifierUnavailable {
                reason: "down".into(),
            })
        }
        fn decompose(&self, _text: &str) -> QuiverResult<Vec<String>> {
            Err(QuiverError::ClassifierUnavailable {
                reason: "down".into(),
            })
        }
    }

    fn decomposer(backend: Arc<dyn IQueryClassifier>) -> TaskDecomposer {
        TaskDecomposer::new(backend, Arc::new(TokenCounter::default()), AnalysisConfig::default())
    }

    fn analysis(complexity: f64) -> Analysis {
        Analysis {
            task_type: TaskType::Factual,
            complexity,
            keywords: Vec::new(),
            entities: Vec::new(),
            degraded: false,
        }
    }

    #[test]
    fn low_complexity_is_identity() {
        let d = decomposer(Arc::new(SplittingBackend(vec![
            "should not be used".into(),
        ])));
        let query = Query::new("What is the capital of France?");
        let result = d.decompose(&query, &analysis(0.2));
        assert_eq!(result.subtasks.len(), 1);
        assert_eq!(result.subtasks[0].text, query.text);
        assert!(!result.degraded);
    }

    #[test]
    fn short_query_is_identity_even_when_complex() {
        let d = decomposer(Arc::new(SplittingBackend(vec!["part".into()])));
        let query = Query::new("Rust vs Go?");
        let result = d.decompose(&query, &analysis(0.9));
        assert_eq!(result.subtasks.len(), 1);
    }

    #[test]
    fn backend_parts_are_capped_and_deduped() {
        let d = decomposer(Arc::new(SplittingBackend(vec![
            "When was Arthur's Magazine founded?".into(),
            "when was arthur's magazine founded".into(),
            "When was First for Women founded?".into(),
            "Who published Arthur's Magazine?".into(),
            "Who owned First for Women?".into(),
        ])));
        let query =
            Query::new("Which magazine was started first, Arthur's Magazine or First for Women?");
        let result = d.decompose(&query, &analysis(0.9));
        assert!(result.subtasks.len() <= 3);
        // The normalized duplicate was dropped.
        let texts: Vec<_> = result.subtasks.iter().map(|s| normalize(&s.text)).collect();
        let unique: std::collections::HashSet<_> = texts.iter().collect();
        assert_eq!(texts.len(), unique.len());
        // Order indexes follow decomposition order.
        for (i, s) in result.subtasks.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn dead_backend_degrades_to_rule_based_split() {
        let d = decomposer(Arc::new(DeadBackend));
        let query = Query::new(
            "Compare machine learning and deep learning for natural language processing workloads",
        );
        let result = d.decompose(&query, &analysis(0.9));
        assert!(result.degraded);
        assert_eq!(result.subtasks.len(), 2);
        assert!(result.subtasks[0].text.contains("machine learning"));
        assert!(result.subtasks[1].text.contains("deep learning"));
    }

    #[test]
    fn dead_backend_without_rule_match_is_identity() {
        let d = decomposer(Arc::new(DeadBackend));
        let query = Query::new(
            "Summarize everything known about the economic history of the Hanseatic League",
        );
        let result = d.decompose(&query, &analysis(0.9));
        assert!(result.degraded);
        assert_eq!(result.subtasks.len(), 1);
        assert_eq!(result.subtasks[0].text, query.text);
    }
}
