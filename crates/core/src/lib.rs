// crates/core/src/lib.rs
//! Mentor-chat core library.
//!
//! Model registry, prompt composition, and the Gemini generation client
//! with its response-classification logic. No HTTP-server code here;
//! the axum layer lives in `mentor-chat-server`.

pub mod llm;
pub mod prompt;
pub mod registry;

pub use llm::{GeminiClient, GenerationError, LlmProvider};
pub use prompt::compose;
pub use registry::ModelRegistry;
