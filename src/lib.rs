#![doc(test(attr(deny(warnings))))]

//! Bookstore Core is a terminal catalog manager for a small bookstore chain:
//! validated prompts, nested menus and a JSON-backed record store for books,
//! authors, publishers, stores and their inventory.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bookstore Core tracing initialized.");
    });
}
