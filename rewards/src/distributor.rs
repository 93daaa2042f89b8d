//! Epoch reward distribution.
//!
//! Once per epoch the host hands the distributor the declared total reward
//! and a snapshot of every active validator's stake, delegated stake,
//! uptime weight, and commission. The distributor enforces the issuance
//! cap, carves up the reward pro rata by weight, splits each validator's
//! share between its own stake and its delegated pool, and appends one RPS
//! checkpoint per active validator.

use crate::error::RewardsError;
use crate::ledger::RpsLedger;
use vesta_types::{Address, EpochNumber, ProtocolParams, Timestamp, RATE_DENOMINATOR};

/// A validator's state as snapshotted at distribution time.
///
/// The validator registry owns these numbers; the distributor only reads
/// them.
#[derive(Clone, Debug)]
pub struct ValidatorSnapshot {
    pub validator: Address,
    pub own_stake: u128,
    pub delegated_stake: u128,
    /// Uptime weight for the epoch. Zero means inactive: no reward and no
    /// checkpoint for this epoch.
    pub uptime_weight: u64,
    /// Commission on the delegated pool's share, parts of 10_000.
    pub commission_bps: u128,
}

/// What one validator received in a distribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorPayout {
    pub validator: Address,
    /// Portion credited directly to the validator (commission + own-stake
    /// share). Value movement is the withdrawal layer's responsibility.
    pub validator_reward: u128,
    /// Portion folded into the delegated pool's RPS index.
    pub delegator_reward: u128,
}

/// Outcome of one epoch distribution.
#[derive(Clone, Debug)]
pub struct DistributionSummary {
    pub epoch: EpochNumber,
    /// Total actually issued. Integer-division remainders stay unissued.
    pub issued: u128,
    pub payouts: Vec<ValidatorPayout>,
}

/// The epoch reward distributor — sole writer of the RPS ledger.
pub struct EpochDistributor {
    params: ProtocolParams,
}

impl EpochDistributor {
    pub fn new(params: ProtocolParams) -> Self {
        Self { params }
    }

    /// Distribute `total_reward` for `epoch` across `snapshots`.
    ///
    /// All-or-nothing: every validation error is raised before the first
    /// checkpoint is appended.
    pub fn distribute(
        &self,
        ledger: &mut RpsLedger,
        epoch: EpochNumber,
        total_reward: u128,
        snapshots: &[ValidatorSnapshot],
        timestamp: Timestamp,
    ) -> Result<DistributionSummary, RewardsError> {
        if total_reward == 0 {
            return Err(RewardsError::ZeroAmount);
        }

        let mut total_stake: u128 = 0;
        let mut total_weight: u128 = 0;
        for snap in snapshots {
            if snap.commission_bps > RATE_DENOMINATOR {
                return Err(RewardsError::InvalidCommission);
            }
            total_stake = total_stake
                .checked_add(snap.own_stake)
                .and_then(|t| t.checked_add(snap.delegated_stake))
                .ok_or(RewardsError::Overflow)?;
            total_weight = total_weight
                .checked_add(snap.uptime_weight as u128)
                .ok_or(RewardsError::Overflow)?;
        }

        let cap = total_stake
            .checked_mul(self.params.epoch_reward_cap_bps)
            .ok_or(RewardsError::Overflow)?
            / RATE_DENOMINATOR;
        if total_reward > cap {
            return Err(RewardsError::RewardCapExceeded {
                declared: total_reward,
                cap,
            });
        }

        if total_weight == 0 {
            return Ok(DistributionSummary {
                epoch,
                issued: 0,
                payouts: Vec::new(),
            });
        }

        // Validate the whole batch, including the RPS index arithmetic,
        // before the first append: a failure on any validator must leave
        // the ledger untouched.
        let mut issued: u128 = 0;
        let mut staged = Vec::new();
        for snap in snapshots {
            if snap.uptime_weight == 0 {
                continue;
            }
            ledger.check_append(&snap.validator, epoch, timestamp)?;
            let share = total_reward
                .checked_mul(snap.uptime_weight as u128)
                .ok_or(RewardsError::Overflow)?
                / total_weight;

            let delegator_reward = if snap.delegated_stake == 0 {
                0
            } else {
                share
                    .checked_mul(RATE_DENOMINATOR - snap.commission_bps)
                    .ok_or(RewardsError::Overflow)?
                    / RATE_DENOMINATOR
            };
            ledger.next_cumulative_rps(&snap.validator, delegator_reward, snap.delegated_stake)?;
            issued = issued.checked_add(share).ok_or(RewardsError::Overflow)?;
            staged.push((snap, delegator_reward, share - delegator_reward));
        }

        let mut payouts = Vec::new();
        for (snap, delegator_reward, validator_reward) in staged {
            ledger.record_epoch(
                &snap.validator,
                epoch,
                delegator_reward,
                snap.delegated_stake,
                timestamp,
            )?;
            payouts.push(ValidatorPayout {
                validator: snap.validator.clone(),
                validator_reward,
                delegator_reward,
            });
        }

        tracing::info!(
            %epoch,
            validators = payouts.len(),
            issued,
            "distributed epoch rewards"
        );
        Ok(DistributionSummary {
            epoch,
            issued,
            payouts,
        })
    }
}
