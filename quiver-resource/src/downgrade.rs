//! Snapshot → downgrade mapping.
//!
//! Warning pressure trims the plan and context; critical pressure drops
//! to a single retriever, halves the context budget, and routes
//! generation to the fallback backend. Downgrade is cooperative: stages
//! read the plan before starting their own work, nothing is preempted.

use tracing::info;

use quiver_core::config::ResourceConfig;
use quiver_core::models::{DowngradePlan, ResourceUsage};

/// Aggregate pressure level across cpu/memory/gpu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pressure {
    Normal,
    Warning,
    Critical,
}

/// The worst pressure level any single resource is under.
pub fn pressure(usage: &ResourceUsage, config: &ResourceConfig) -> Pressure {
    let checks = [
        (usage.cpu_percent, config.cpu_warning, config.cpu_critical),
        (
            usage.memory_percent,
            config.memory_warning,
            config.memory_critical,
        ),
        (usage.gpu_percent, config.gpu_warning, config.gpu_critical),
    ];

    let mut level = Pressure::Normal;
    for (value, warning, critical) in checks {
        if value >= critical {
            return Pressure::Critical;
        }
        if value >= warning {
            level = Pressure::Warning;
        }
    }
    level
}

/// Derive the downgrade plan for one request from the latest snapshot.
pub fn downgrade_plan(usage: &ResourceUsage, config: &ResourceConfig) -> DowngradePlan {
    match pressure(usage, config) {
        Pressure::Normal => DowngradePlan::none(),
        Pressure::Warning => {
            info!(
                cpu = usage.cpu_percent,
                memory = usage.memory_percent,
                "resource warning, trimming plan and context"
            );
            DowngradePlan {
                max_retrievers: Some(2),
                budget_scale: 0.75,
                prefer_fallback_generator: false,
            }
        }
        Pressure::Critical => {
            info!(
                cpu = usage.cpu_percent,
                memory = usage.memory_percent,
                gpu = usage.gpu_percent,
                "resource critical, minimal strategy"
            );
            DowngradePlan {
                max_retrievers: Some(1),
                budget_scale: 0.5,
                prefer_fallback_generator: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(cpu: f64, memory: f64, gpu: f64) -> ResourceUsage {
        ResourceUsage {
            cpu_percent: cpu,
            memory_percent: memory,
            gpu_percent: gpu,
            ..ResourceUsage::default()
        }
    }

    #[test]
    fn idle_system_has_no_downgrade() {
        let plan = downgrade_plan(&usage(10.0, 20.0, 0.0), &ResourceConfig::default());
        assert!(plan.is_none());
    }

    #[test]
    fn warning_trims_but_keeps_primary_generator() {
        let plan = downgrade_plan(&usage(85.0, 20.0, 0.0), &ResourceConfig::default());
        assert_eq!(plan.max_retrievers, Some(2));
        assert!(!plan.prefer_fallback_generator);
        assert!((plan.budget_scale - 0.75).abs() < 1e-9);
    }

    #[test]
    fn any_critical_resource_forces_minimal_strategy() {
        let plan = downgrade_plan(&usage(10.0, 96.0, 0.0), &ResourceConfig::default());
        assert_eq!(plan.max_retrievers, Some(1));
        assert!(plan.prefer_fallback_generator);
        assert!((plan.budget_scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn worst_resource_wins() {
        assert_eq!(
            pressure(&usage(85.0, 96.0, 0.0), &ResourceConfig::default()),
            Pressure::Critical
        );
        assert_eq!(
            pressure(&usage(85.0, 10.0, 81.0), &ResourceConfig::default()),
            Pressure::Warning
        );
    }
}
