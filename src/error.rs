//! Error types for the client library
//!
//! Every fallible operation returns `Result<_, ClientError>`. No variant is
//! fatal to a session: callers log the error, surface it, and keep going.

use thiserror::Error;

/// Client-side error taxonomy
///
/// Covers transport failures, non-2xx backend responses, and the few
/// conditions validated locally before any request is made.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network-level failure (connection refused, timeout, bad TLS, ...)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-2xx status
    #[error("Server returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the backend's error envelope, or the raw body
        message: String,
    },

    /// Message was blank after trimming; no request was issued
    #[error("Message is empty")]
    EmptyMessage,

    /// Operation requires an initialized session
    #[error("Chat session is not initialized")]
    NotInitialized,

    /// Feedback submitted with no flagged response pending
    #[error("No feedback is pending")]
    NoPendingFeedback,
}

impl ClientError {
    /// HTTP status code of the error, if the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
