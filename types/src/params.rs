//! Protocol parameters for the incentive ledger.
//!
//! Every field is tunable by the (external) governance layer; the core only
//! reads them. Defaults match the reference deployment.

use crate::units::RATE_DENOMINATOR;
use serde::{Deserialize, Serialize};

/// All incentive-ledger parameters stored by every node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Distribution ─────────────────────────────────────────────────────
    /// Cap on an epoch's declared total reward, as parts of 10_000 of the
    /// snapshotted total stake. Prevents over-issuance by a buggy or
    /// malicious epoch committer.
    pub epoch_reward_cap_bps: u128,

    // ── Vesting positions ────────────────────────────────────────────────
    /// Minimum principal (raw units) to open a vesting position.
    pub min_vesting_stake: u128,

    /// Maximum committed duration in weeks. Twice the full-bonus horizon:
    /// anything past 52 weeks earns the capped bonus anyway.
    pub max_duration_weeks: u64,

    /// Hard cap on top-up checkpoints per position lifetime.
    pub max_top_ups: u32,

    // ── Multipliers ──────────────────────────────────────────────────────
    /// Base reward rate (parts of 10_000). 10_000 = 1.0×.
    pub base_rate: u128,

    /// Stability multiplier granted while a position (or top-up interval)
    /// has not fully matured.
    pub default_rsi: u128,

    /// Stability multiplier granted once a position is fully matured with
    /// no unmatured top-up outstanding.
    pub max_rsi: u128,
}

impl ProtocolParams {
    /// Reference deployment defaults.
    pub fn vesta_defaults() -> Self {
        Self {
            epoch_reward_cap_bps: 100,
            min_vesting_stake: 1_000,
            max_duration_weeks: 104,
            max_top_ups: 52,
            base_rate: RATE_DENOMINATOR,
            default_rsi: RATE_DENOMINATOR,
            max_rsi: 15_000,
        }
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::vesta_defaults()
    }
}
