//! Reward-per-share accounting for the Vesta incentive ledger.
//!
//! The cumulative RPS index is the numeric foundation of the whole system:
//! one append-only checkpoint sequence per validator, written once per
//! epoch by the distributor, read forever by claim resolution. History is
//! never compacted — any matured position must remain reconstructible.
//!
//! This crate handles:
//! - Checkpoint append with strict epoch/timestamp monotonicity
//! - O(log n) historical lookup (latest checkpoint at or before an epoch)
//! - Epoch reward distribution: uptime-weighted validator shares, the
//!   commission split between own stake and the delegated pool, and the
//!   issuance cap

pub mod checkpoint;
pub mod distributor;
pub mod error;
pub mod ledger;

pub use checkpoint::RpsCheckpoint;
pub use distributor::{DistributionSummary, EpochDistributor, ValidatorPayout, ValidatorSnapshot};
pub use error::RewardsError;
pub use ledger::RpsLedger;
