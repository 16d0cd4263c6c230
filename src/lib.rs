#![doc(test(attr(deny(warnings))))]

//! MyMoney Core turns an owner's raw income and expense records into period
//! summaries, category breakdowns and budget-versus-actual progress.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{LedgerManager, OwnerContext};
pub use errors::LedgerError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        let build = utils::build_info::current();
        tracing::info!(
            version = build.version,
            revision = build.revision,
            built_at = build.built_at,
            profile = build.profile,
            "MyMoney Core tracing initialized."
        );
    });
}
