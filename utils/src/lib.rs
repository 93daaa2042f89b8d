//! Shared utilities for the Vesta incentive ledger.

pub mod logging;
pub mod time;

pub use logging::init_tracing;
pub use time::{format_duration, weeks_to_secs};
