//! FAQ API endpoints
//!
//! Client for the per-subject FAQ sheet: the backend stores questions in a
//! CSV file on Drive, so entries arrive with string timestamps and an
//! answer column that is empty while a question is pending.

use crate::api::client::ApiClient;
use crate::error::ClientError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used in the FAQ sheet
const FAQ_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a subject's FAQ sheet
#[derive(Debug, Clone, Deserialize)]
pub struct FaqEntry {
    /// Row number, 1-based; renumbered by the backend after deletions
    pub number: u32,
    /// The question text
    pub question: String,
    /// The answer, absent while the question is pending
    #[serde(default)]
    pub answer: Option<String>,
    /// When the question was asked, as recorded in the sheet
    #[serde(default)]
    pub date_asked: Option<String>,
    /// When the question was answered
    #[serde(default)]
    pub date_answered: Option<String>,
}

impl FaqEntry {
    /// Whether the question is still awaiting an answer
    pub fn is_pending(&self) -> bool {
        self.answer.as_deref().map_or(true, |a| a.trim().is_empty())
    }

    /// Parsed answer timestamp, when present and well-formed
    pub fn answered_at(&self) -> Option<NaiveDateTime> {
        self.date_answered
            .as_deref()
            .and_then(|d| NaiveDateTime::parse_from_str(d, FAQ_DATE_FORMAT).ok())
    }
}

/// FAQ listing split into pending and answered questions
#[derive(Debug, Deserialize)]
pub struct FaqListing {
    /// Questions without an answer yet
    pub pending_questions: Vec<FaqEntry>,
    /// Questions that have been answered
    pub answered_questions: Vec<FaqEntry>,
}

#[derive(Debug, Deserialize)]
struct PendingResponse {
    pending_questions: Vec<FaqEntry>,
    count: usize,
}

#[derive(Debug, Serialize)]
struct AnswerRequest<'a> {
    question_number: u32,
    answer: &'a str,
}

/// Fields to change on an existing FAQ entry; `None` leaves a field as is
#[derive(Debug, Default, Serialize)]
pub struct FaqUpdate<'a> {
    /// Replacement question text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<&'a str>,
    /// Replacement answer text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<&'a str>,
}

/// Client for the `/professor/faq/*` endpoints
#[derive(Debug, Clone)]
pub struct FaqApi {
    client: ApiClient,
}

impl FaqApi {
    /// Wrap a shared [`ApiClient`]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch all FAQ entries for a subject, split pending/answered
    pub async fn questions(&self, subject_id: i64) -> Result<FaqListing, ClientError> {
        self.client
            .get_json(&format!("/professor/faq/subject/{}/questions", subject_id))
            .await
    }

    /// Fetch only the pending questions, with their count
    pub async fn pending(&self, subject_id: i64) -> Result<(Vec<FaqEntry>, usize), ClientError> {
        let response: PendingResponse = self
            .client
            .get_json(&format!(
                "/professor/faq/subject/{}/questions/pending",
                subject_id
            ))
            .await?;
        Ok((response.pending_questions, response.count))
    }

    /// Answer a pending question
    pub async fn answer(
        &self,
        subject_id: i64,
        question_number: u32,
        answer: &str,
    ) -> Result<(), ClientError> {
        self.client
            .post_json_unit(
                &format!("/professor/faq/subject/{}/questions/answer", subject_id),
                &AnswerRequest {
                    question_number,
                    answer,
                },
            )
            .await
    }

    /// Edit an existing entry's question and/or answer
    pub async fn update(
        &self,
        subject_id: i64,
        question_number: u32,
        update: &FaqUpdate<'_>,
    ) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .client
            .put_json(
                &format!(
                    "/professor/faq/subject/{}/questions/{}",
                    subject_id, question_number
                ),
                update,
            )
            .await?;
        Ok(())
    }

    /// Delete an entry; the backend renumbers the remaining rows
    pub async fn delete(&self, subject_id: i64, question_number: u32) -> Result<(), ClientError> {
        self.client
            .delete(&format!(
                "/professor/faq/subject/{}/questions/{}",
                subject_id, question_number
            ))
            .await
    }
}
