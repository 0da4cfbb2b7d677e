// crates/core/src/registry.rs
//! Model registry: maps short client-supplied selectors to fully
//! qualified Gemini model names, with a designated default.

use std::collections::HashMap;

use tracing::{debug, warn};

/// Model used whenever a selector is missing or unrecognized.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Built-in selector table exposed to the chat UI.
const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("0", "gemini-2.0-flash-lite"),
    ("1", "gemini-2.0-flash"),
    ("2", "gemini-2.5-pro-exp-03-25"),
];

/// Immutable selector → model-name map.
///
/// Constructed once at startup and shared read-only across requests, so
/// no synchronization is needed. `resolve` is total: every input string
/// yields a non-empty model name.
#[derive(Clone)]
pub struct ModelRegistry {
    models: HashMap<String, String>,
    default_model: String,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("model_count", &self.models.len())
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl ModelRegistry {
    /// Build a registry from explicit entries and a default model name.
    pub fn new<I, K, V>(entries: I, default_model: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            models: entries
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
            default_model: default_model.into(),
        }
    }

    /// Build the registry with the built-in selector table.
    pub fn with_defaults() -> Self {
        Self::new(BUILTIN_MODELS.iter().copied(), DEFAULT_MODEL)
    }

    /// Resolve a selector to a model name. Never fails:
    /// - empty selector → default model
    /// - unknown selector → default model
    /// - known selector → mapped name
    pub fn resolve(&self, selector: &str) -> &str {
        if selector.is_empty() {
            debug!(default = %self.default_model, "no model selector in request, using default");
            return &self.default_model;
        }
        match self.models.get(selector) {
            Some(name) => name,
            None => {
                warn!(
                    selector = %selector,
                    default = %self.default_model,
                    "unknown model selector, using default"
                );
                &self.default_model
            }
        }
    }

    /// The model name used for fallback.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Iterate over (selector, model name) pairs in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.models.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }
}
