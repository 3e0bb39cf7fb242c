//! Course Companion Client Library
//!
//! Typed Rust client for the course-assistant backend: chat sessions with
//! history and feedback, the professor dashboard surface (subjects, Drive
//! files, knowledge base, FAQs), and a bounded Drive connection poller.
//! The terminal binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
/// Chat session lifecycle and per-subject session registry
pub mod session;
pub mod view;
