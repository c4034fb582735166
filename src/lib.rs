#![doc(test(attr(deny(warnings))))]

//! Quote Core implements the web-design quote questionnaire: a multi-step
//! wizard state machine with undo/redo history, deterministic pricing, and
//! keyed session persistence, plus the interactive CLI that drives it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod questionnaire;
pub mod session;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Quote Core tracing initialized.");
    });
}
