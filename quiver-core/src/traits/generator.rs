use crate::answer::GenerationParams;
use crate::errors::QuiverResult;

/// Text generation backend.
///
/// Must raise a distinguishable error on failure rather than returning
/// empty text; the selector owns the retry/fallback policy so backend
/// implementations stay simple.
pub trait IGeneratorBackend: Send + Sync {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> QuiverResult<String>;
}
