use std::sync::Arc;

use tracing::warn;

use quiver_core::query::{Query, TaskType};
use quiver_core::traits::IQueryClassifier;

use crate::heuristics;

/// Output of query analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub task_type: TaskType,
    /// Complexity signal in [0, 1]; gates decomposition.
    pub complexity: f64,
    pub keywords: Vec<String>,
    pub entities: Vec<String>,
    /// Set when the classifier backend failed and the heuristic was used.
    pub degraded: bool,
}

/// Classifies a raw query into a task type and extracts the complexity
/// signal. Pure function of the query text plus one classifier call.
pub struct QueryAnalyzer {
    classifier: Arc<dyn IQueryClassifier>,
}

impl QueryAnalyzer {
    pub fn new(classifier: Arc<dyn IQueryClassifier>) -> Self {
        Self { classifier }
    }

    /// Analyze a query. Never fails: a classifier error falls back to the
    /// cue-word heuristic and flags the result as degraded.
    pub fn analyze(&self, query: &Query) -> Analysis {
        let entities = heuristics::extract_entities(&query.text);
        let keywords = heuristics::extract_keywords(&query.text);
        let complexity = heuristics::complexity(&query.text, &entities);

        let (task_type, degraded) = match self.classifier.classify(&query.text) {
            Ok(task_type) => (task_type, false),
            Err(e) => {
                warn!(query_id = %query.id, error = %e, "classifier failed, using heuristic");
                (heuristics::classify(&query.text, &entities), true)
            }
        };

        Analysis {
            task_type,
            complexity,
            keywords,
            entities,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiver_core::errors::{QuiverError, QuiverResult};

    struct FixedClassifier(TaskType);

    impl IQueryClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> QuiverResult<TaskType> {
            Ok(self.0)
        }
        fn decompose(&self, _text: &str) -> QuiverResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    struct DeadClassifier;

    impl IQueryClassifier for DeadClassifier {
        fn classify(&self, _text: &str) -> QuiverResult<TaskType> {
            Err(QuiverError::ClassifierUnavailable {
                reason: "connection refused".into(),
            })
        }
        fn decompose(&self, _text: &str) -> QuiverResult<Vec<String>> {
            Err(QuiverError::ClassifierUnavailable {
                reason: "connection refused".into(),
            })
        }
    }

    #[test]
    fn backend_classification_wins_when_available() {
        let analyzer = QueryAnalyzer::new(Arc::new(FixedClassifier(TaskType::Semantic)));
        let analysis = analyzer.analyze(&Query::new("compare apples and oranges"));
        assert_eq!(analysis.task_type, TaskType::Semantic);
        assert!(!analysis.degraded);
    }

    #[test]
    fn dead_backend_degrades_to_heuristic() {
        let analyzer = QueryAnalyzer::new(Arc::new(DeadClassifier));
        let analysis = analyzer.analyze(&Query::new("Compare Python and Java"));
        assert_eq!(analysis.task_type, TaskType::Comparative);
        assert!(analysis.degraded);
    }
}
