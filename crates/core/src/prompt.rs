// crates/core/src/prompt.rs
//! Prompt composition for the assisted-learning mode.

use std::borrow::Cow;

/// Instructional preamble prepended to the user's message when assisted
/// learning is enabled. Opaque content; edit the text file, not code.
pub const ASSISTED_LEARNING_TEMPLATE: &str = include_str!("prompt/assisted_learning.txt");

/// Build the final prompt sent to the model.
///
/// With `assisted_learning` off the message passes through unchanged
/// (and unallocated). With it on, the template is concatenated
/// immediately before the message, with no separator beyond what the
/// template itself ends with.
///
/// Message emptiness is validated by the request handler, not here.
pub fn compose(message: &str, assisted_learning: bool) -> Cow<'_, str> {
    if assisted_learning {
        Cow::Owned(format!("{ASSISTED_LEARNING_TEMPLATE}{message}"))
    } else {
        Cow::Borrowed(message)
    }
}
