//! Backend capability traits.
//!
//! Backends are modeled as small fixed capability interfaces behind a
//! registry keyed by name, not inheritance hierarchies, so swapping one is
//! a configuration change. Implementations live outside this workspace;
//! the pipeline only depends on these contracts.

pub mod classifier;
pub mod generator;
pub mod reranker;
pub mod resource;
pub mod retriever;

pub use classifier::IQueryClassifier;
pub use generator::IGeneratorBackend;
pub use reranker::IRerankerBackend;
pub use resource::IResourceProbe;
pub use retriever::IRetrieverBackend;
