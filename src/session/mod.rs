//! Chat session module
//!
//! Owns the per-subject conversation lifecycle: state machine, local
//! history, and the feedback flow.

pub mod chat_session;
pub mod models;
pub mod store;

pub use chat_session::{ChatSession, SendOutcome, SessionState};
pub use models::{Exchange, FeedbackContext};
pub use store::SessionStore;
