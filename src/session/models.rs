//! Session data models

use serde::{Deserialize, Serialize};

/// One question/response pair in a conversation
///
/// Appended in arrival order and never modified afterwards; local history
/// order therefore equals chronological send order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// The question the user asked
    pub question: String,
    /// The assistant's raw response, including any sources suffix
    pub response: String,
}

/// A flagged response awaiting feedback submission
///
/// Created by `flag_for_review`, consumed by `submit_feedback` or
/// discarded. At most one is live per session at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackContext {
    /// The question that produced the flagged response
    pub original_question: String,
    /// The response being flagged
    pub bot_response: String,
}
