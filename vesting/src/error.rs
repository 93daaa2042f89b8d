//! Vesting-specific errors.
//!
//! Every failure carries the specific reason so off-core tooling can
//! recompute correct parameters and resubmit. Nothing is retried here.

use thiserror::Error;
use vesta_rewards::RewardsError;
use vesta_types::Address;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VestingError {
    #[error("principal below minimum: need {needed}, got {got}")]
    BelowMinimum { needed: u128, got: u128 },

    #[error("duration of {0} weeks is outside the permitted range")]
    InvalidDuration(u64),

    #[error("an active or maturing position already exists for this identity")]
    PositionAlreadyOpen,

    #[error("previous position's rewards must be claimed before reopening")]
    RewardsNotClaimed,

    #[error("position is not active")]
    PositionNotActive,

    #[error("top-up checkpoint cap reached for this position")]
    TooManyTopUps,

    #[error("a top-up was already made this epoch")]
    TopUpAlreadyMade,

    #[error("epoch index does not resolve to a claimable checkpoint")]
    InvalidEpoch,

    #[error("top-up index {supplied} is later than the checkpoint's range (expected {expected})")]
    LaterTopUp { supplied: usize, expected: usize },

    #[error("top-up index {supplied} is earlier than the checkpoint's range (expected {expected})")]
    EarlierTopUp { supplied: usize, expected: usize },

    #[error("top-up index {0} is out of bounds")]
    InvalidTopUpIndex(usize),

    #[error("insufficient vested balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("no stake account for identity {0}")]
    UnknownIdentity(Address),

    #[error("arithmetic overflow in vesting computation")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] RewardsError),

    #[error("store error: {0}")]
    Store(String),
}
