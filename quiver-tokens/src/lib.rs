//! # quiver-tokens
//!
//! Token counting for context budgets. One tokenizer, loaded once,
//! shared across the pipeline.

pub mod counter;

pub use counter::TokenCounter;
