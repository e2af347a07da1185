use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

/// One row of the generation routing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRoute {
    /// Prompt template id.
    pub template: String,
    /// Generation backend name.
    pub backend: String,
    pub max_tokens: usize,
    pub temperature: f64,
}

/// Generator selection configuration.
///
/// Routes are keyed by `"task_type:bucket"` (e.g. `"factual:small"`);
/// unmapped combinations use `default_route`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub routes: BTreeMap<String, GenerationRoute>,
    pub default_route: GenerationRoute,
    /// Backend tried once when the selected backend errors. The selector,
    /// not the backends, owns this retry policy.
    pub fallback_backend: String,
    /// Context item count at or below which the context counts as small.
    pub small_context_max_items: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            default_route: GenerationRoute {
                template: "grounded".to_string(),
                backend: defaults::DEFAULT_PRIMARY_BACKEND.to_string(),
                max_tokens: defaults::DEFAULT_MAX_TOKENS,
                temperature: defaults::DEFAULT_TEMPERATURE,
            },
            fallback_backend: defaults::DEFAULT_FALLBACK_BACKEND.to_string(),
            small_context_max_items: defaults::DEFAULT_SMALL_CONTEXT_MAX_ITEMS,
        }
    }
}

fn route(template: &str, max_tokens: usize, temperature: f64) -> GenerationRoute {
    GenerationRoute {
        template: template.to_string(),
        backend: defaults::DEFAULT_PRIMARY_BACKEND.to_string(),
        max_tokens,
        temperature,
    }
}

/// Default task-type × context-size routing table.
pub fn default_routes() -> BTreeMap<String, GenerationRoute> {
    BTreeMap::from([
        ("factual:small".to_string(), route("definition", 128, 0.3)),
        ("factual:large".to_string(), route("grounded", 256, 0.3)),
        ("comparative:small".to_string(), route("comparison", 256, 0.5)),
        ("comparative:large".to_string(), route("comparison", 384, 0.5)),
        ("temporal:small".to_string(), route("temporal", 128, 0.3)),
        ("temporal:large".to_string(), route("temporal", 256, 0.3)),
        ("multi_hop:small".to_string(), route("synthesis", 256, 0.5)),
        ("multi_hop:large".to_string(), route("synthesis", 384, 0.5)),
    ])
}
