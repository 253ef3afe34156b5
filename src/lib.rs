#![doc(test(attr(deny(warnings))))]

//! Envelope Core offers the ledger, budgeting, and reporting primitives
//! behind an envelope-style budgeting application: accounts and buckets,
//! an append-only transaction log, and balances derived by folding it.

pub mod config;
pub mod core;
pub mod currency;
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
        tracing::info!("Envelope Core tracing initialized.");
    });
}
