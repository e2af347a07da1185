use std::collections::BTreeMap;
use std::sync::Arc;

use quiver_core::traits::IRetrieverBackend;

/// Name-keyed retriever registry. Built once at startup, read-only
/// afterwards; backend swapping is a configuration change, not a code
/// change.
#[derive(Default, Clone)]
pub struct RetrieverRegistry {
    backends: BTreeMap<String, Arc<dyn IRetrieverBackend>>,
}

impl RetrieverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, backend: Arc<dyn IRetrieverBackend>) {
        self.backends.insert(name.into(), backend);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IRetrieverBackend>> {
        self.backends.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
