use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which retrieval methods to invoke for one subtask, and how much each
/// contributes to fusion.
///
/// Weights for selected methods sum to 1; unselected methods are absent.
/// `BTreeMap` keeps iteration order deterministic, which the fusion
/// engine's tie-break rules depend on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalPlan {
    pub weights: BTreeMap<String, f64>,
}

impl RetrievalPlan {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Scale all weights so they sum to 1. No-op on an empty plan or when
    /// all weights are zero.
    pub fn renormalize(&mut self) {
        let total: f64 = self.weights.values().sum();
        if total > f64::EPSILON {
            for w in self.weights.values_mut() {
                *w /= total;
            }
        }
    }

    /// Drop a retriever from the plan and renormalize the survivors.
    pub fn remove(&mut self, retriever: &str) {
        if self.weights.remove(retriever).is_some() {
            self.renormalize();
        }
    }
}
