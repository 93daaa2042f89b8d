//! The append-only reward-per-share ledger.

use crate::checkpoint::RpsCheckpoint;
use crate::error::RewardsError;
use std::collections::HashMap;
use vesta_types::{Address, EpochNumber, Timestamp, RPS_SCALE};

/// Per-validator append-only RPS checkpoint sequences.
///
/// The only writer is the epoch distributor; claim resolution reads but
/// never mutates. Because entries are immutable once appended, historical
/// claims stay valid as new epochs arrive — no locking beyond the
/// atomicity of each call.
#[derive(Clone, Debug, Default)]
pub struct RpsLedger {
    sequences: HashMap<Address, Vec<RpsCheckpoint>>,
}

impl RpsLedger {
    pub fn new() -> Self {
        Self {
            sequences: HashMap::new(),
        }
    }

    /// The checkpoint sequence for a validator, empty if none recorded yet.
    pub fn sequence(&self, validator: &Address) -> &[RpsCheckpoint] {
        self.sequences
            .get(validator)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The checkpoint at a given index, if it exists.
    pub fn checkpoint(&self, validator: &Address, index: usize) -> Option<&RpsCheckpoint> {
        self.sequences.get(validator).and_then(|seq| seq.get(index))
    }

    /// The most recent checkpoint for a validator.
    pub fn latest(&self, validator: &Address) -> Option<&RpsCheckpoint> {
        self.sequences.get(validator).and_then(|seq| seq.last())
    }

    /// Check that a checkpoint for `(validator, epoch, timestamp)` could be
    /// appended without violating the ordering invariants. Used by the
    /// distributor to validate a whole batch before mutating anything.
    pub fn check_append(
        &self,
        validator: &Address,
        epoch: EpochNumber,
        timestamp: Timestamp,
    ) -> Result<(), RewardsError> {
        if let Some(last) = self.latest(validator) {
            if epoch == last.epoch {
                return Err(RewardsError::DuplicateEpoch(epoch));
            }
            if epoch < last.epoch || timestamp <= last.timestamp {
                return Err(RewardsError::NonMonotonic);
            }
        }
        Ok(())
    }

    /// The cumulative index value appending `(delegator_reward,
    /// delegated_stake)` would produce, without mutating the sequence.
    /// Lets the distributor validate a whole batch's arithmetic before
    /// the first append. With zero delegated stake the index stays flat
    /// (no division by zero).
    pub fn next_cumulative_rps(
        &self,
        validator: &Address,
        delegator_reward: u128,
        delegated_stake: u128,
    ) -> Result<u128, RewardsError> {
        let prev_rps = self.latest(validator).map(|c| c.cumulative_rps).unwrap_or(0);
        if delegated_stake == 0 {
            return Ok(prev_rps);
        }
        let delta = delegator_reward
            .checked_mul(RPS_SCALE)
            .ok_or(RewardsError::Overflow)?
            / delegated_stake;
        prev_rps.checked_add(delta).ok_or(RewardsError::Overflow)
    }

    /// Append one checkpoint for `(validator, epoch)`.
    ///
    /// `delegator_reward` is the portion of the epoch's reward assigned to
    /// this validator's delegated pool. A checkpoint is recorded even when
    /// the delegated pool is empty, so indices stay contiguous for lookup.
    pub fn record_epoch(
        &mut self,
        validator: &Address,
        epoch: EpochNumber,
        delegator_reward: u128,
        delegated_stake: u128,
        timestamp: Timestamp,
    ) -> Result<(), RewardsError> {
        self.check_append(validator, epoch, timestamp)?;
        let cumulative_rps =
            self.next_cumulative_rps(validator, delegator_reward, delegated_stake)?;

        self.sequences
            .entry(validator.clone())
            .or_default()
            .push(RpsCheckpoint {
                epoch,
                cumulative_rps,
                timestamp,
            });
        tracing::debug!(%validator, %epoch, cumulative_rps, "recorded RPS checkpoint");
        Ok(())
    }

    /// Binary search for the latest checkpoint with `epoch <= target`.
    ///
    /// This is the O(log n) primitive behind historical reward
    /// reconstruction; ties break to the most recent `<=` match. Fails with
    /// [`RewardsError::NotFound`] if the sequence is empty or the target
    /// predates the first checkpoint.
    pub fn find_checkpoint_index(
        &self,
        validator: &Address,
        epoch: EpochNumber,
    ) -> Result<usize, RewardsError> {
        let seq = self.sequence(validator);
        let first_above = seq.partition_point(|c| c.epoch <= epoch);
        if first_above == 0 {
            return Err(RewardsError::NotFound);
        }
        Ok(first_above - 1)
    }

    /// The cumulative RPS value at the latest checkpoint with
    /// `epoch <= target`, or an error if none exists.
    pub fn rps_at(&self, validator: &Address, epoch: EpochNumber) -> Result<u128, RewardsError> {
        let idx = self.find_checkpoint_index(validator, epoch)?;
        Ok(self.sequence(validator)[idx].cumulative_rps)
    }

    /// The timestamp of the latest checkpoint with `epoch <= target`.
    pub fn time_at(
        &self,
        validator: &Address,
        epoch: EpochNumber,
    ) -> Result<Timestamp, RewardsError> {
        let idx = self.find_checkpoint_index(validator, epoch)?;
        Ok(self.sequence(validator)[idx].timestamp)
    }
}

impl RpsLedger {
    /// Persist all sequences to a ledger store.
    pub fn save_to_store(&self, store: &dyn vesta_store::LedgerStore) -> Result<(), RewardsError> {
        for (validator, seq) in &self.sequences {
            let bytes =
                bincode::serialize(seq).map_err(|e| RewardsError::Store(e.to_string()))?;
            store
                .put_sequence(validator, &bytes)
                .map_err(|e| RewardsError::Store(e.to_string()))?;
        }
        Ok(())
    }

    /// Restore all sequences from a ledger store.
    pub fn load_from_store(store: &dyn vesta_store::LedgerStore) -> Result<Self, RewardsError> {
        let entries = store
            .iter_sequences()
            .map_err(|e| RewardsError::Store(e.to_string()))?;
        let mut sequences = HashMap::new();
        for (validator, bytes) in entries {
            let seq: Vec<RpsCheckpoint> =
                bincode::deserialize(&bytes).map_err(|e| RewardsError::Store(e.to_string()))?;
            sequences.insert(validator, seq);
        }
        Ok(Self { sequences })
    }
}
