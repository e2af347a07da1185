use crate::models::ResourceUsage;

/// Resource usage sampling, refreshed on an interval independent of
/// request processing. Implementations must not block.
pub trait IResourceProbe: Send + Sync {
    fn current_usage(&self) -> ResourceUsage;
}
