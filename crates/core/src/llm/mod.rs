// crates/core/src/llm/mod.rs
//! Generation-client module.
//!
//! Provides the `LlmProvider` trait the server depends on, the Gemini
//! wire types with their response-classification logic, and the
//! reqwest-backed `GeminiClient` implementation.

pub mod envelope;
pub mod gemini;
pub mod provider;
pub mod types;

pub use envelope::{classify, GenerateContentResponse};
pub use gemini::GeminiClient;
pub use provider::LlmProvider;
pub use types::{BlockStage, GenerationError};
