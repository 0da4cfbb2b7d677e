// crates/core/src/llm/provider.rs
//! LlmProvider trait defining the interface for generation backends.

use async_trait::async_trait;

use super::types::GenerationError;

/// A backend that can turn (model name, prompt) into generated text.
///
/// The server depends on this trait rather than on `GeminiClient`
/// directly so route handlers can be tested against a scripted fake.
/// Implementations must be safe for concurrent use by multiple in-flight
/// requests; the provider session is a shared, long-lived resource.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform one generation call and classify the result.
    ///
    /// `model_name` is guaranteed non-empty by the model registry; the
    /// prompt may be any string and is passed through untouched.
    async fn generate(&self, model_name: &str, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name for logging/display (e.g. "gemini").
    fn name(&self) -> &str;
}
