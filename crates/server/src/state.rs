// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use mentor_chat_core::{LlmProvider, ModelRegistry};

/// Shared application state accessible from all route handlers.
///
/// Everything here is immutable or internally synchronized: the registry
/// is read-only after startup and the provider session is shared and
/// safe for concurrent in-flight requests, so handlers take no locks.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Selector → model-name table with fallback.
    pub registry: ModelRegistry,
    /// Generation backend (Gemini in production, scripted in tests).
    pub llm: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(registry: ModelRegistry, llm: Arc<dyn LlmProvider>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            registry,
            llm,
        })
    }

    /// Seconds since the server started.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
