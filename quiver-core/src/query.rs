use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// Unique request id.
    pub id: Uuid,
    /// Raw query text.
    pub text: String,
    /// Prior conversation turns, if the caller supplies them.
    pub conversation: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            conversation: None,
        }
    }

    pub fn with_conversation(text: impl Into<String>, conversation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            conversation: Some(conversation.into()),
        }
    }
}

/// Coarse classification of a query's reasoning shape.
///
/// Produced once per (sub)query and never mutated. Downstream stages key
/// their weight and template tables off this tag, so new task types extend
/// the system by adding table rows, not code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Factual,
    Semantic,
    MultiHop,
    Comparative,
    Temporal,
    Other,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Factual => "factual",
            TaskType::Semantic => "semantic",
            TaskType::MultiHop => "multi_hop",
            TaskType::Comparative => "comparative",
            TaskType::Temporal => "temporal",
            TaskType::Other => "other",
        }
    }
}

/// One unit of retrieval work produced by decomposition.
///
/// Request-scoped: created at decomposition time, consumed by the planner
/// and fusion engine, discarded after the cross-subtask merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    /// Subtask query text.
    pub text: String,
    /// Id of the query this subtask was derived from.
    pub parent_id: Uuid,
    /// Position in the decomposition. Used as the deterministic merge
    /// order and tie-break across subtasks.
    pub index: usize,
    pub task_type: TaskType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_type_serializes_snake_case() {
        let json = serde_json::to_string(&TaskType::MultiHop).unwrap();
        assert_eq!(json, "\"multi_hop\"");
        let back: TaskType = serde_json::from_str("\"comparative\"").unwrap();
        assert_eq!(back, TaskType::Comparative);
    }

    #[test]
    fn queries_get_distinct_ids() {
        let a = Query::new("what is rust");
        let b = Query::new("what is rust");
        assert_ne!(a.id, b.id);
    }
}
