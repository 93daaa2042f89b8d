//! RPS checkpoints — the immutable per-epoch ledger entries.

use serde::{Deserialize, Serialize};
use vesta_types::{EpochNumber, Timestamp};

/// One entry in a validator's reward-per-share sequence.
///
/// Immutable once appended: the cumulative index at `epoch` is exactly the
/// reward one unit of delegated stake had earned by the end of that epoch,
/// scaled by `RPS_SCALE`. An epoch with no entry means the validator was
/// inactive; lookups skip to the nearest earlier checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsCheckpoint {
    pub epoch: EpochNumber,
    pub cumulative_rps: u128,
    pub timestamp: Timestamp,
}
