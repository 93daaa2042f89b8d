//! Reward-ledger errors.

use thiserror::Error;
use vesta_types::EpochNumber;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewardsError {
    #[error("no checkpoint at or before the queried epoch")]
    NotFound,

    #[error("{0} already has a checkpoint for this validator")]
    DuplicateEpoch(EpochNumber),

    #[error("checkpoint epoch/timestamp must strictly increase")]
    NonMonotonic,

    #[error("declared reward {declared} exceeds issuance cap {cap}")]
    RewardCapExceeded { declared: u128, cap: u128 },

    #[error("commission rate exceeds the rate denominator")]
    InvalidCommission,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("store error: {0}")]
    Store(String),
}
