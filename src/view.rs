//! Typed view models
//!
//! The original UI built HTML strings straight from response text. These
//! types replace that with an explicit response-to-view transformation the
//! rendering surface consumes, keeping markup decisions out of the data.

use crate::session::Exchange;
use serde::Serialize;

/// Delimiter between a response body and its sources suffix
const SOURCES_DELIMITER: &str = "\n\nSources:";

/// A bot response split into displayable parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    /// Response text without the sources suffix
    pub body: String,
    /// Documents the answer was drawn from, when the backend reported any
    pub sources: Option<String>,
}

impl MessageView {
    /// Split a raw response on the `"\n\nSources:"` delimiter
    pub fn from_response(raw: &str) -> Self {
        match raw.split_once(SOURCES_DELIMITER) {
            Some((body, sources)) => Self {
                body: body.to_string(),
                sources: Some(sources.trim().to_string()),
            },
            None => Self {
                body: raw.to_string(),
                sources: None,
            },
        }
    }

    /// Rendered sources line, e.g. `"Sources Searched: doc1.pdf"`
    pub fn sources_line(&self) -> Option<String> {
        self.sources
            .as_ref()
            .map(|s| format!("Sources Searched: {}", s))
    }
}

/// One line of a rendered conversation transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptLine {
    /// A question the user asked
    User(String),
    /// A bot response, already split into body and sources
    Bot(MessageView),
}

/// Render a history into transcript lines, preserving exchange order
///
/// Each exchange contributes its question followed by its response, so the
/// rendered transcript matches the history's chronological order exactly.
pub fn transcript(history: &[Exchange]) -> Vec<TranscriptLine> {
    let mut lines = Vec::with_capacity(history.len() * 2);
    for exchange in history {
        lines.push(TranscriptLine::User(exchange.question.clone()));
        lines.push(TranscriptLine::Bot(MessageView::from_response(
            &exchange.response,
        )));
    }
    lines
}
