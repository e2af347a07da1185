//! # quiver-resource
//!
//! Cross-cutting resource awareness. A background refresher samples the
//! probe on an interval and publishes the latest snapshot; each request
//! reads the snapshot once, derives a downgrade plan, and passes it into
//! the stages. Stages never write resource state.

pub mod downgrade;
pub mod monitor;
pub mod tracing_setup;

pub use downgrade::{downgrade_plan, pressure, Pressure};
pub use monitor::ResourceMonitor;
