// crates/core/src/llm/types.rs
//! Error types for the generation client.

use thiserror::Error;

/// Which side of the exchange the provider's safety policy rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStage {
    /// The input was rejected before generation began.
    Prompt,
    /// Generation started but the completion was stopped on policy grounds.
    Completion,
}

impl std::fmt::Display for BlockStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStage::Prompt => write!(f, "prompt"),
            BlockStage::Completion => write!(f, "completion"),
        }
    }
}

/// The non-success outcomes of one remote generation call.
///
/// Produced exactly once per call by the classification logic in
/// [`super::envelope::classify`] (or by the transport wrapper around it);
/// never retried, never cached. A successful call yields the extracted
/// text instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The provider refused the prompt or the completion on policy grounds.
    #[error("{stage} blocked by the provider's safety policy: {reason}")]
    Blocked { stage: BlockStage, reason: String },

    /// The provider returned no usable text for non-policy reasons
    /// (missing envelope, truncation, empty content).
    #[error("no usable text in provider response: {detail}")]
    Empty { detail: String },

    /// Network, auth, quota, HTTP-status, or deadline failure reaching
    /// the provider. The detail is for logs only; callers must not
    /// surface it verbatim.
    #[error("transport failure reaching the provider: {detail}")]
    Transport { detail: String },
}

impl GenerationError {
    pub fn empty(detail: impl Into<String>) -> Self {
        Self::Empty { detail: detail.into() }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport { detail: detail.into() }
    }
}
