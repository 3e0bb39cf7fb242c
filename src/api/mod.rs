//! API module
//!
//! Typed clients for the course-assistant backend HTTP surface.

pub mod chat;
pub mod client;
pub mod faq;
pub mod professor;

pub use chat::ChatApi;
pub use client::ApiClient;
pub use faq::FaqApi;
pub use professor::ProfessorApi;
