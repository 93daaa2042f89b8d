//! Epoch numbering.
//!
//! An epoch is a fixed block range for which rewards are distributed once.
//! The core never derives epochs from block heights itself; the epoch-commit
//! collaborator validates ranges and hands the core a bare number.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A monotonically increasing epoch number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EpochNumber(u64);

impl EpochNumber {
    pub const GENESIS: Self = Self(0);

    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The epoch immediately after this one, saturating at `u64::MAX`.
    pub fn next(&self) -> EpochNumber {
        EpochNumber(self.0.saturating_add(1))
    }
}

impl fmt::Display for EpochNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch {}", self.0)
    }
}
