//! Chat Session
//!
//! Manages one conversation lifecycle against a subject-scoped chat
//! backend. The session moves through a small state machine:
//!
//! `Uninitialized → Initializing → Ready ⇄ Sending`, plus
//! `Ready → Resetting → Ready`.
//!
//! Any network failure returns the session to its prior stable state; no
//! failure is fatal and the session stays usable afterwards.

use crate::api::chat::{ChatApi, FeedbackSubmission};
use crate::error::ClientError;
use crate::session::models::{Exchange, FeedbackContext};
use crate::view::MessageView;
use tracing::{debug, info, warn};

/// Lifecycle state of a [`ChatSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created but not yet initialized against the backend
    Uninitialized,
    /// Initialize request in flight
    Initializing,
    /// Initialized and idle
    Ready,
    /// Query request in flight; further sends are no-ops
    Sending,
    /// Reset request in flight
    Resetting,
}

/// Result of a [`ChatSession::send`] call
#[derive(Debug)]
pub enum SendOutcome {
    /// The backend replied; exactly one exchange was appended to history
    Replied(MessageView),
    /// A request was already in flight; nothing was sent
    Busy,
}

/// One conversation against a subject-scoped chat backend
///
/// Owned exclusively by its caller; all operations take `&mut self`. The
/// busy flag is the session state itself: a send attempted while a request
/// is in flight is a no-op, not a queued or rejected operation.
#[derive(Debug)]
pub struct ChatSession {
    api: ChatApi,
    subject_id: i64,
    state: SessionState,
    history: Vec<Exchange>,
    feedback: Option<FeedbackContext>,
}

impl ChatSession {
    /// Create an uninitialized session for a subject
    pub fn new(api: ChatApi, subject_id: i64) -> Self {
        Self {
            api,
            subject_id,
            state: SessionState::Uninitialized,
            history: Vec::new(),
            feedback: None,
        }
    }

    /// Subject this session is bound to
    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session has completed initialization
    pub fn is_initialized(&self) -> bool {
        !matches!(
            self.state,
            SessionState::Uninitialized | SessionState::Initializing
        )
    }

    /// Whether a request is currently in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SessionState::Initializing | SessionState::Sending | SessionState::Resetting
        )
    }

    /// Local conversation history, in chronological send order
    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// The flagged response currently awaiting submission, if any
    pub fn pending_feedback(&self) -> Option<&FeedbackContext> {
        self.feedback.as_ref()
    }

    /// Initialize (or re-initialize) the session
    ///
    /// On a failed initialize call no state is mutated. On success the
    /// local history is cleared, the session becomes Ready, and the
    /// persisted history is fetched and replayed. A failed history fetch
    /// leaves the session Ready with empty history and surfaces the error;
    /// the session is usable regardless.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        let prior = self.state;
        self.state = SessionState::Initializing;

        debug!(subject_id = self.subject_id, "Initializing chat session");

        if let Err(e) = self.api.initialize(self.subject_id).await {
            self.state = prior;
            return Err(e);
        }

        self.history.clear();
        self.feedback = None;
        self.state = SessionState::Ready;

        match self.api.history(self.subject_id).await {
            Ok(history) => {
                info!(
                    subject_id = self.subject_id,
                    replayed = history.len(),
                    "Chat session initialized"
                );
                self.history = history;
                Ok(())
            }
            Err(e) => {
                warn!(
                    subject_id = self.subject_id,
                    error = %e,
                    "Initialized but failed to load persisted history"
                );
                Err(e)
            }
        }
    }

    /// Send a question to the backend
    ///
    /// No-op while a request is in flight. The trimmed message must be
    /// non-empty; a blank message performs no request and no history
    /// mutation. Exactly one exchange is appended, and only after a
    /// successful response.
    pub async fn send(&mut self, message: &str) -> Result<SendOutcome, ClientError> {
        if self.is_busy() {
            debug!(subject_id = self.subject_id, "Send ignored while busy");
            return Ok(SendOutcome::Busy);
        }
        if !matches!(self.state, SessionState::Ready) {
            return Err(ClientError::NotInitialized);
        }

        let question = message.trim();
        if question.is_empty() {
            return Err(ClientError::EmptyMessage);
        }

        self.state = SessionState::Sending;
        let result = self.api.query(self.subject_id, question).await;
        self.state = SessionState::Ready;

        let response = result?;
        self.history.push(Exchange {
            question: question.to_string(),
            response: response.clone(),
        });

        debug!(
            subject_id = self.subject_id,
            history_len = self.history.len(),
            "Exchange appended"
        );

        Ok(SendOutcome::Replied(MessageView::from_response(&response)))
    }

    /// Clear server-side and local history
    ///
    /// Idempotent; a no-op on an uninitialized session. On failure the
    /// local history is left untouched and the session returns to Ready.
    pub async fn reset(&mut self) -> Result<(), ClientError> {
        if !self.is_initialized() {
            return Ok(());
        }
        if self.is_busy() {
            return Ok(());
        }

        self.state = SessionState::Resetting;
        let result = self.api.reset(self.subject_id).await;
        self.state = SessionState::Ready;

        result?;
        self.history.clear();
        info!(subject_id = self.subject_id, "Chat history reset");
        Ok(())
    }

    /// Flag a response for professor review
    ///
    /// Captures the most recent exchange's question (empty when there is
    /// none) paired with the flagged response, replacing any previously
    /// flagged response. Returns the question as a pre-fill for editing
    /// before submission.
    pub fn flag_for_review(&mut self, response: &str) -> String {
        let question = self
            .history
            .last()
            .map(|e| e.question.clone())
            .unwrap_or_default();

        self.feedback = Some(FeedbackContext {
            original_question: question.clone(),
            bot_response: response.to_string(),
        });

        question
    }

    /// Submit the flagged response with a possibly edited question
    ///
    /// The feedback context is consumed up front, so it is cleared
    /// regardless of whether the request succeeds.
    pub async fn submit_feedback(&mut self, edited_question: &str) -> Result<(), ClientError> {
        let context = self.feedback.take().ok_or(ClientError::NoPendingFeedback)?;

        let submission = FeedbackSubmission {
            original_question: context.original_question,
            question_for_review: edited_question.to_string(),
            bot_response: context.bot_response,
        };

        self.api.feedback(self.subject_id, &submission).await?;
        info!(subject_id = self.subject_id, "Feedback submitted for review");
        Ok(())
    }

    /// Drop the flagged response without submitting
    pub fn discard_feedback(&mut self) {
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::ApiClient;
    use mockito::{Matcher, Server, ServerGuard};

    fn ready_session(server: &ServerGuard, subject_id: i64) -> ChatSession {
        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            subject_id,
        );
        session.state = SessionState::Ready;
        session
    }

    #[tokio::test]
    async fn test_blank_send_performs_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/query/42")
            .expect(0)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        let result = session.send("   \t ").await;

        mock.assert_async().await;
        assert!(matches!(result.unwrap_err(), ClientError::EmptyMessage));
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_send_before_initialize_is_an_error() {
        let server = Server::new_async().await;
        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            42,
        );

        let result = session.send("hello").await;
        assert!(matches!(result.unwrap_err(), ClientError::NotInitialized));
    }

    #[tokio::test]
    async fn test_send_while_busy_is_a_no_op() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/query/42")
            .expect(0)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.state = SessionState::Sending;

        let result = session.send("another question").await.unwrap();

        mock.assert_async().await;
        assert!(matches!(result, SendOutcome::Busy));
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_successful_send_appends_one_exchange() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/query/42")
            .match_body(Matcher::JsonString(
                r#"{"question": "What is X?"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"response": "X is Y.\n\nSources: doc1.pdf", "subject_id": 42}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        let outcome = session.send("  What is X?  ").await.unwrap();

        mock.assert_async().await;
        match outcome {
            SendOutcome::Replied(view) => {
                assert_eq!(view.body, "X is Y.");
                assert_eq!(view.sources.as_deref(), Some("doc1.pdf"));
            }
            SendOutcome::Busy => panic!("Expected a reply"),
        }
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].question, "What is X?");
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_failed_send_leaves_history_unchanged() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/query/42")
            .with_status(500)
            .with_body(r#"{"error": "Error processing query"}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "earlier?".to_string(),
            response: "earlier.".to_string(),
        });

        let result = session.send("What is X?").await;

        mock.assert_async().await;
        assert!(result.is_err());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_initialize_failure_mutates_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/initialize/42")
            .with_status(404)
            .with_body(r#"{"error": "No knowledge base found for this subject"}"#)
            .create_async()
            .await;

        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            42,
        );
        let result = session.initialize().await;

        mock.assert_async().await;
        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_replays_persisted_history() {
        let mut server = Server::new_async().await;
        let init_mock = server
            .mock("POST", "/chat/initialize/42")
            .with_status(200)
            .with_body(r#"{"message": "Chat initialized successfully"}"#)
            .create_async()
            .await;
        let history_mock = server
            .mock("GET", "/chat/42/history")
            .with_status(200)
            .with_body(
                r#"{"history": [
                    {"question": "a?", "response": "A."},
                    {"question": "b?", "response": "B."}
                ], "subject_id": 42}"#,
            )
            .create_async()
            .await;

        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            42,
        );
        session.initialize().await.unwrap();

        init_mock.assert_async().await;
        history_mock.assert_async().await;
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].question, "a?");
        assert_eq!(session.history()[1].question, "b?");
    }

    #[tokio::test]
    async fn test_initialize_discards_stale_history_and_feedback() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/initialize/42")
            .with_status(200)
            .with_body(r#"{"message": "Chat initialized successfully"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/chat/42/history")
            .with_status(200)
            .with_body(r#"{"history": [], "subject_id": 42}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "stale?".to_string(),
            response: "stale.".to_string(),
        });
        session.flag_for_review("stale.");

        session.initialize().await.unwrap();

        assert!(session.history().is_empty());
        assert!(session.pending_feedback().is_none());
    }

    #[tokio::test]
    async fn test_initialize_survives_history_fetch_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/initialize/42")
            .with_status(200)
            .with_body(r#"{"message": "Chat initialized successfully"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/chat/42/history")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;

        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            42,
        );
        let result = session.initialize().await;

        assert!(result.is_err());
        // Session is still usable, just without the replayed history.
        assert!(session.is_initialized());
        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_reset_is_idempotent_when_uninitialized() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/42/reset")
            .expect(0)
            .create_async()
            .await;

        let mut session = ChatSession::new(
            ChatApi::new(ApiClient::with_base_url(server.url())),
            42,
        );
        session.reset().await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reset_clears_local_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/42/reset")
            .with_status(200)
            .with_body(r#"{"message": "Chat history reset successfully"}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "q?".to_string(),
            response: "r.".to_string(),
        });

        session.reset().await.unwrap();

        mock.assert_async().await;
        assert!(session.history().is_empty());
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_local_history() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/42/reset")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "q?".to_string(),
            response: "r.".to_string(),
        });

        let result = session.reset().await;

        mock.assert_async().await;
        assert!(result.is_err());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_flag_captures_latest_question() {
        let server = Server::new_async().await;
        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "first?".to_string(),
            response: "one.".to_string(),
        });
        session.history.push(Exchange {
            question: "second?".to_string(),
            response: "two.".to_string(),
        });

        let prefill = session.flag_for_review("two.");

        assert_eq!(prefill, "second?");
        let context = session.pending_feedback().unwrap();
        assert_eq!(context.original_question, "second?");
        assert_eq!(context.bot_response, "two.");
    }

    #[tokio::test]
    async fn test_flag_with_empty_history_prefills_empty_question() {
        let server = Server::new_async().await;
        let mut session = ready_session(&server, 42);

        let prefill = session.flag_for_review("unprompted response");

        assert_eq!(prefill, "");
        assert!(session.pending_feedback().is_some());
    }

    #[tokio::test]
    async fn test_second_flag_replaces_the_first() {
        let server = Server::new_async().await;
        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "q1?".to_string(),
            response: "r1.".to_string(),
        });

        session.flag_for_review("r1.");
        session.history.push(Exchange {
            question: "q2?".to_string(),
            response: "r2.".to_string(),
        });
        session.flag_for_review("r2.");

        let context = session.pending_feedback().unwrap();
        assert_eq!(context.original_question, "q2?");
        assert_eq!(context.bot_response, "r2.");
    }

    #[tokio::test]
    async fn test_submit_feedback_sends_edited_question() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/feedback/42")
            .match_body(Matcher::JsonString(
                r#"{
                    "originalQuestion": "What is X?",
                    "questionForReview": "What exactly is X?",
                    "botResponse": "X is Y."
                }"#
                .to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"message": "Question received for review successfully"}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "What is X?".to_string(),
            response: "X is Y.".to_string(),
        });
        session.flag_for_review("X is Y.");

        session.submit_feedback("What exactly is X?").await.unwrap();

        mock.assert_async().await;
        assert!(session.pending_feedback().is_none());
    }

    #[tokio::test]
    async fn test_feedback_context_cleared_even_on_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/feedback/42")
            .with_status(500)
            .with_body(r#"{"error": "Failed to process submission"}"#)
            .create_async()
            .await;

        let mut session = ready_session(&server, 42);
        session.history.push(Exchange {
            question: "q?".to_string(),
            response: "r.".to_string(),
        });
        session.flag_for_review("r.");

        let result = session.submit_feedback("q edited?").await;

        mock.assert_async().await;
        assert!(result.is_err());
        assert!(session.pending_feedback().is_none());

        // A second submit has nothing to send.
        let result = session.submit_feedback("again?").await;
        assert!(matches!(
            result.unwrap_err(),
            ClientError::NoPendingFeedback
        ));
    }

    #[tokio::test]
    async fn test_discard_feedback() {
        let server = Server::new_async().await;
        let mut session = ready_session(&server, 42);
        session.flag_for_review("r.");
        assert!(session.pending_feedback().is_some());

        session.discard_feedback();
        assert!(session.pending_feedback().is_none());
    }
}
