// crates/core/src/llm/envelope.rs
//! Gemini response envelope and its classification into a single outcome.
//!
//! The `generateContent` envelope is polymorphic: prompt feedback may be
//! absent, the candidate list may be empty, a candidate's content and
//! parts may be missing, and parts come in text and non-text variants.
//! Every field that the API may omit is modeled as an `Option` or a
//! defaulted collection, and presence is checked explicitly, never assumed.

use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{BlockStage, GenerationError};

/// Top-level response envelope of one `generateContent` call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Input-level feedback. A block reason other than `Unspecified` means
/// generation never started.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<BlockReason>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

/// One ranked completion option. Only the first candidate is ever
/// consumed: the provider ranks them and this service is not an
/// ensemble consumer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<FinishReason>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

/// A candidate's content payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One content fragment. Text parts contribute to the reply; any other
/// variant (inline data, function calls, …) is skipped with a warning.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    Other(serde_json::Value),
}

/// Per-category safety rating, kept only for diagnostic logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    pub category: Option<String>,
    pub probability: Option<String>,
}

/// Why the prompt was rejected before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BlockReason {
    #[serde(rename = "BLOCK_REASON_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "SAFETY")]
    Safety,
    #[serde(rename = "BLOCKLIST")]
    Blocklist,
    #[serde(rename = "PROHIBITED_CONTENT")]
    ProhibitedContent,
    #[serde(rename = "OTHER")]
    Other,
    /// Values this build does not know about yet.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BlockReason::Unspecified => "BLOCK_REASON_UNSPECIFIED",
            BlockReason::Safety => "SAFETY",
            BlockReason::Blocklist => "BLOCKLIST",
            BlockReason::ProhibitedContent => "PROHIBITED_CONTENT",
            BlockReason::Other => "OTHER",
            BlockReason::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Why a candidate's generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FinishReason {
    #[serde(rename = "FINISH_REASON_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "STOP")]
    Stop,
    #[serde(rename = "MAX_TOKENS")]
    MaxTokens,
    #[serde(rename = "SAFETY")]
    Safety,
    #[serde(rename = "RECITATION")]
    Recitation,
    #[serde(rename = "BLOCKLIST")]
    Blocklist,
    #[serde(rename = "PROHIBITED_CONTENT")]
    ProhibitedContent,
    #[serde(rename = "SPII")]
    Spii,
    #[serde(rename = "MALFORMED_FUNCTION_CALL")]
    MalformedFunctionCall,
    /// Values this build does not know about yet.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FinishReason::Unspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Blocklist => "BLOCKLIST",
            FinishReason::ProhibitedContent => "PROHIBITED_CONTENT",
            FinishReason::Spii => "SPII",
            FinishReason::MalformedFunctionCall => "MALFORMED_FUNCTION_CALL",
            FinishReason::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Classify one response envelope into extracted text or a typed failure.
///
/// Pure function of the envelope (logging aside); re-running it on the
/// same envelope always yields the same outcome. The check order is a
/// hard contract:
///
/// 1. missing envelope → empty
/// 2. prompt-level block → blocked (checked before candidates: an
///    input-level block implies no meaningful candidates exist)
/// 3. no candidates → empty
/// 4. first candidate finished on `SAFETY` → blocked
/// 5. any other non-`STOP`, non-unspecified finish → empty (truncated or
///    policy-adjacent text is never returned silently)
/// 6. missing content / zero parts → empty
/// 7. concatenate text parts in order, skipping non-text parts; an empty
///    result is still empty
pub fn classify(
    model_name: &str,
    response: Option<&GenerateContentResponse>,
) -> Result<String, GenerationError> {
    let Some(response) = response else {
        warn!(model = %model_name, "gemini response envelope was missing");
        return Err(GenerationError::empty("no response object"));
    };

    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            if reason != BlockReason::Unspecified {
                warn!(model = %model_name, reason = %reason, "prompt blocked by provider");
                return Err(GenerationError::Blocked {
                    stage: BlockStage::Prompt,
                    reason: reason.to_string(),
                });
            }
        }
    }

    if response.candidates.is_empty() {
        warn!(model = %model_name, "gemini response contained no candidates");
        return Err(GenerationError::empty("no candidates"));
    }

    // Only the top-ranked candidate is consumed.
    let candidate = &response.candidates[0];

    if candidate.finish_reason == Some(FinishReason::Safety) {
        warn!(model = %model_name, "generation stopped by safety settings");
        if !candidate.safety_ratings.is_empty() {
            debug!(model = %model_name, ratings = ?candidate.safety_ratings, "safety ratings");
        }
        return Err(GenerationError::Blocked {
            stage: BlockStage::Completion,
            reason: FinishReason::Safety.to_string(),
        });
    }

    if let Some(reason) = candidate.finish_reason {
        if reason != FinishReason::Stop && reason != FinishReason::Unspecified {
            warn!(model = %model_name, reason = %reason, "generation stopped unexpectedly");
            return Err(GenerationError::empty(format!("unexpected finish reason: {reason}")));
        }
    }

    let parts = match &candidate.content {
        Some(content) if !content.parts.is_empty() => &content.parts,
        _ => {
            warn!(model = %model_name, "candidate content or parts missing");
            return Err(GenerationError::empty("empty content"));
        }
    };

    let mut full_text = String::new();
    for part in parts {
        match part {
            Part::Text { text } => full_text.push_str(text),
            Part::Other(value) => {
                warn!(model = %model_name, part = %value, "skipping non-text part in response");
            }
        }
    }

    if full_text.is_empty() {
        warn!(model = %model_name, "extracted text is empty after processing parts");
        return Err(GenerationError::empty("extracted text empty"));
    }

    Ok(full_text)
}
