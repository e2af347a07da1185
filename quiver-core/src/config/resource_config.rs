use serde::{Deserialize, Serialize};

use super::defaults;

/// Resource monitoring thresholds and refresh interval.
///
/// Crossing a warning threshold triggers a moderate downgrade (fewer
/// retrievers, smaller context); crossing a critical threshold triggers an
/// aggressive one (single retriever, halved context, fallback generator).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub cpu_warning: f64,
    pub cpu_critical: f64,
    pub memory_warning: f64,
    pub memory_critical: f64,
    pub gpu_warning: f64,
    pub gpu_critical: f64,
    /// How often the background refresher samples the probe.
    pub refresh_interval_secs: u64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            cpu_warning: defaults::DEFAULT_CPU_WARNING,
            cpu_critical: defaults::DEFAULT_CPU_CRITICAL,
            memory_warning: defaults::DEFAULT_MEMORY_WARNING,
            memory_critical: defaults::DEFAULT_MEMORY_CRITICAL,
            gpu_warning: defaults::DEFAULT_GPU_WARNING,
            gpu_critical: defaults::DEFAULT_GPU_CRITICAL,
            refresh_interval_secs: defaults::DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}
