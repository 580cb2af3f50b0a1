#![doc(test(attr(deny(warnings))))]

//! SpendSmart tracks expenses against monthly category budgets, raises alerts
//! as limits approach, and offers an assistant over the recorded data.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("SpendSmart tracing initialized.");
    });
}
