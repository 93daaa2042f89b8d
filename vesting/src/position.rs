//! Vesting position and balance-record types.

use serde::{Deserialize, Serialize};
use vesta_types::{Address, EpochNumber, Timestamp};

/// Lifecycle state of a vesting position, always derived from `now` —
/// never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    /// `now < end`: principal is locked, early exit is penalized.
    Active,
    /// `end <= now < end + duration`: grace period; no penalty, but the
    /// matured stability rate is not yet granted.
    Maturing,
    /// `now >= end + duration`: full multipliers available.
    Matured,
}

/// A vesting position. A zero tuple (`duration_secs == 0`) means "unused".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingPosition {
    pub start: Timestamp,
    pub end: Timestamp,
    /// Current committed duration, extended by top-ups (≤ 2× original).
    pub duration_secs: u64,
    /// Duration committed at open; fixes the top-up extension quantum and
    /// the per-top-up maturity horizon.
    pub original_duration_secs: u64,
    /// Base reward rate (parts of 10_000), fixed at open.
    pub base_rate: u128,
    /// Vest-bonus rate from the duration step table, fixed at open.
    pub vest_bonus: u128,
    /// Stability rate this position earns once fully matured.
    pub rsi_bonus: u128,
}

impl VestingPosition {
    /// The cleared tuple.
    pub fn zero() -> Self {
        Self {
            start: Timestamp::EPOCH,
            end: Timestamp::EPOCH,
            duration_secs: 0,
            original_duration_secs: 0,
            base_rate: 0,
            vest_bonus: 0,
            rsi_bonus: 0,
        }
    }

    /// Whether a position is currently open (vesting).
    pub fn is_open(&self) -> bool {
        self.duration_secs != 0
    }

    /// Derive the lifecycle state at `now`.
    pub fn state(&self, now: Timestamp) -> PositionState {
        if now < self.end {
            PositionState::Active
        } else if self.end.has_expired(self.duration_secs, now) {
            PositionState::Matured
        } else {
            PositionState::Maturing
        }
    }

    /// Reset to the zero tuple (entire vested balance removed).
    pub fn clear(&mut self) {
        *self = Self::zero();
    }
}

/// Why a balance record exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceKind {
    /// The position's opening balance (always record 0).
    Opened,
    /// A mid-position principal increase; counts against the top-up cap.
    TopUp,
    /// A mid-position principal reduction; exempt from the cap.
    Cut,
}

/// One entry in a position's ordered balance history.
///
/// Strictly increasing in epoch. These records are what let claim
/// resolution separate fully-aged principal from top-up principal that has
/// not yet earned its bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub epoch: EpochNumber,
    pub balance_after: u128,
    pub kind: BalanceKind,
}

/// Everything the core tracks for one identity (a staker, or one
/// (validator, delegator) pair).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeAccount {
    /// The validator whose RPS sequence this account reads.
    pub validator: Address,
    pub position: VestingPosition,
    /// Ordered balance history; index 0 is the opening record. Survives a
    /// full cut until rewards are claimed.
    pub balances: Vec<BalanceRecord>,
    /// Lifetime top-up count, capped by `ProtocolParams::max_top_ups`.
    pub top_up_count: u32,
    /// Index into the validator's RPS sequence through which rewards have
    /// been paid. `None` means nothing claimed yet.
    pub claimed_through: Option<usize>,
    /// RPS value snapshotted at open; the first claim interval starts here.
    pub baseline_rps: u128,
}

impl StakeAccount {
    /// Current vested balance (the latest balance record).
    pub fn balance(&self) -> u128 {
        self.balances.last().map(|r| r.balance_after).unwrap_or(0)
    }
}
