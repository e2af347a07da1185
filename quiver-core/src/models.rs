use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded when a stage falls back to a cheaper or simpler behavior after
/// a dependency failure, without aborting the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn new(
        component: impl Into<String>,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Per-stage wall-clock breakdown for one request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StageTimings {
    pub analyze_ms: u64,
    pub decompose_ms: u64,
    pub retrieve_ms: u64,
    pub rerank_ms: u64,
    pub generate_ms: u64,
    pub total_ms: u64,
}

/// Strategy downgrade decided from the latest resource snapshot before a
/// request starts. Stages only read it; the resource monitor owns writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DowngradePlan {
    /// Cap on retrievers per plan; the highest-weighted survive.
    pub max_retrievers: Option<usize>,
    /// Multiplier applied to the context budget, in (0, 1].
    pub budget_scale: f64,
    /// Route generation straight to the fallback backend.
    pub prefer_fallback_generator: bool,
}

impl DowngradePlan {
    /// No downgrade: full plan, full budget, primary generator.
    pub fn none() -> Self {
        Self {
            max_retrievers: None,
            budget_scale: 1.0,
            prefer_fallback_generator: false,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }
}

impl Default for DowngradePlan {
    fn default() -> Self {
        Self::none()
    }
}

/// Point-in-time resource usage percentages from the probe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub gpu_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl Default for ResourceUsage {
    fn default() -> Self {
        Self {
            cpu_percent: 0.0,
            memory_percent: 0.0,
            gpu_percent: 0.0,
            timestamp: Utc::now(),
        }
    }
}
