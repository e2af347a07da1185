//! # quiver-generation
//!
//! Last pipeline stage: pick a generation strategy from the task type and
//! context size, render the prompt, and invoke the backend with a single
//! retry against the fallback backend. The selector owns the retry
//! policy; backends stay simple.

pub mod engine;
pub mod selector;
pub mod templates;

pub use engine::{GenerationEngine, GenerationOutcome};
pub use selector::{ContextBucket, GeneratorSelector};
