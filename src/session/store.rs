//! Session store
//!
//! Explicit per-subject session registry. The original UI kept per-subject
//! chat state in module-level singletons; the store replaces that hidden
//! shared state with a value the caller owns and passes by reference.
//!
//! Single-threaded by design: the session is owned exclusively by its
//! controller, so the store hands out `&mut` references instead of locked
//! handles.

use crate::api::chat::ChatApi;
use crate::error::ClientError;
use crate::session::chat_session::ChatSession;
use std::collections::HashMap;
use tracing::{debug, info};

/// Registry of chat sessions, one per subject
#[derive(Debug)]
pub struct SessionStore {
    api: ChatApi,
    sessions: HashMap<i64, ChatSession>,
}

impl SessionStore {
    /// Create an empty store backed by the given chat API
    pub fn new(api: ChatApi) -> Self {
        Self {
            api,
            sessions: HashMap::new(),
        }
    }

    /// Get an initialized session for a subject, creating one on demand
    ///
    /// An already-initialized session is reused as is. Otherwise a new
    /// session is created and initialized; if the initialize call itself
    /// fails, nothing is stored. A session that initialized but could not
    /// replay its persisted history is stored (it is usable) and the error
    /// is still surfaced.
    pub async fn open(&mut self, subject_id: i64) -> Result<&mut ChatSession, ClientError> {
        let reusable = self
            .sessions
            .get(&subject_id)
            .is_some_and(ChatSession::is_initialized);

        if reusable {
            debug!(subject_id, "Reusing existing chat session");
        } else {
            let mut session = ChatSession::new(self.api.clone(), subject_id);
            let result = session.initialize().await;

            if session.is_initialized() {
                info!(subject_id, "Chat session created and stored");
                self.sessions.insert(subject_id, session);
            }
            result?;
        }

        let api = self.api.clone();
        Ok(self
            .sessions
            .entry(subject_id)
            .or_insert_with(|| ChatSession::new(api, subject_id)))
    }

    /// Look up an existing session without creating one
    pub fn get_mut(&mut self, subject_id: i64) -> Option<&mut ChatSession> {
        self.sessions.get_mut(&subject_id)
    }

    /// Drop a subject's session
    pub fn remove(&mut self, subject_id: i64) -> Option<ChatSession> {
        self.sessions.remove(&subject_id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
