//! Chat API endpoints
//!
//! Typed client for the subject-scoped `/chat/*` surface: subject listing,
//! session initialization, queries, history, reset, and feedback.

use crate::api::client::ApiClient;
use crate::error::ClientError;
use crate::session::Exchange;
use serde::{Deserialize, Serialize};

/// A subject available for chat
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    /// Subject unique identifier
    pub id: i64,
    /// Subject display name
    pub name: String,
    /// ID of the professor who owns the subject
    #[serde(default)]
    pub professor_id: Option<i64>,
}

/// Response from `GET /chat/subjects`
#[derive(Debug, Deserialize)]
struct SubjectsResponse {
    subjects: Vec<Subject>,
}

/// Response from `POST /chat/initialize/{subjectId}`
#[derive(Debug, Deserialize)]
struct InitializeResponse {
    #[allow(dead_code)]
    message: String,
}

/// Request body for `POST /chat/query/{subjectId}`
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
}

/// Response from `POST /chat/query/{subjectId}`
#[derive(Debug, Deserialize)]
struct QueryResponse {
    response: String,
}

/// Response from `GET /chat/{subjectId}/history`
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    history: Vec<Exchange>,
}

/// A flagged response submitted for professor review
///
/// Field names match the backend's camelCase wire format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    /// The question as originally asked
    pub original_question: String,
    /// The question after user edits, as submitted for review
    pub question_for_review: String,
    /// The response being flagged
    pub bot_response: String,
}

/// Client for the `/chat/*` endpoints
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: ApiClient,
}

impl ChatApi {
    /// Wrap a shared [`ApiClient`]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List subjects that have a knowledge base
    pub async fn subjects(&self) -> Result<Vec<Subject>, ClientError> {
        let response: SubjectsResponse = self.client.get_json("/chat/subjects").await?;
        Ok(response.subjects)
    }

    /// Initialize a chat session for a subject
    pub async fn initialize(&self, subject_id: i64) -> Result<(), ClientError> {
        let _: InitializeResponse = self
            .client
            .post(&format!("/chat/initialize/{}", subject_id))
            .await?;
        Ok(())
    }

    /// Ask a question; returns the raw response text
    ///
    /// The response may carry a `"\n\nSources:"` suffix that the caller
    /// splits into body and sources (see [`crate::view::MessageView`]).
    pub async fn query(&self, subject_id: i64, question: &str) -> Result<String, ClientError> {
        let response: QueryResponse = self
            .client
            .post_json(&format!("/chat/query/{}", subject_id), &QueryRequest { question })
            .await?;
        Ok(response.response)
    }

    /// Fetch the persisted conversation history, in chronological order
    pub async fn history(&self, subject_id: i64) -> Result<Vec<Exchange>, ClientError> {
        let response: HistoryResponse = self
            .client
            .get_json(&format!("/chat/{}/history", subject_id))
            .await?;
        Ok(response.history)
    }

    /// Clear the server-side conversation history
    pub async fn reset(&self, subject_id: i64) -> Result<(), ClientError> {
        self.client
            .post_unit(&format!("/chat/{}/reset", subject_id))
            .await
    }

    /// Submit a flagged response for review
    pub async fn feedback(
        &self,
        subject_id: i64,
        submission: &FeedbackSubmission,
    ) -> Result<(), ClientError> {
        self.client
            .post_json_unit(&format!("/chat/feedback/{}", subject_id), submission)
            .await
    }
}
