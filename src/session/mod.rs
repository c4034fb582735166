//! Keyed persistence for questionnaire sessions.

pub mod store;

pub use store::{SessionStore, SessionSummary, SESSION_PREFIX};
