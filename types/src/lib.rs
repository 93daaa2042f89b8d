//! Fundamental types for the Vesta incentive ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, epochs, timestamps, fixed-point scales, and
//! protocol parameters.

pub mod address;
pub mod epoch;
pub mod params;
pub mod time;
pub mod units;

pub use address::Address;
pub use epoch::EpochNumber;
pub use params::ProtocolParams;
pub use time::Timestamp;
pub use units::{RATE_DENOMINATOR, RPS_SCALE, SECS_PER_WEEK};
