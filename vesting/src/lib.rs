//! Vesting-position accounting for the Vesta incentive ledger.
//!
//! A vesting position locks a principal for a committed duration in
//! exchange for a reward-bonus multiplier. This crate handles:
//! - Position lifecycle: Active → Maturing → Matured, derived from time
//! - Top-up tracking as ordered balance checkpoints (rate-limited, capped)
//! - Pure bonus/penalty math: vest-bonus step table, stability multiplier,
//!   early-exit penalty
//! - Claim resolution against the RPS ledger, with index validation that
//!   derives the expected checkpoint range from stored data instead of
//!   trusting caller arithmetic

pub mod bonus;
pub mod claim;
pub mod engine;
pub mod error;
pub mod position;

pub use engine::{CutOutcome, PayoutEvent, VestingBook};
pub use error::VestingError;
pub use position::{BalanceKind, BalanceRecord, PositionState, StakeAccount, VestingPosition};
