#![doc(test(attr(deny(warnings))))]

//! Member Form is a console membership registry built around a resumable
//! multi-field form engine: batched key input, single-line editors with
//! undo/redo, per-field validation and a focus-navigation coordinator.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod form;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Member Form tracing initialized.");
    });
}
