//! Fixed-point scales and time constants.
//!
//! Amounts are raw `u128` token units. The cumulative reward-per-share index
//! is scaled by [`RPS_SCALE`] so that one raw reward spread across a large
//! delegated pool still registers; rates (commission, bonuses, RSI) are
//! parts of [`RATE_DENOMINATOR`]. No floating point anywhere in the core.

/// Scale factor for the cumulative reward-per-share index.
///
/// `rps += reward * RPS_SCALE / delegated_stake`; the inverse division
/// happens exactly once, at reward reconstruction, so rounding dust is
/// bounded by one raw unit per claim interval.
pub const RPS_SCALE: u128 = 1_000_000_000_000;

/// Denominator for all rate values (basis-point style, 10_000 = 1.0×).
pub const RATE_DENOMINATOR: u128 = 10_000;

/// Seconds in one week; vesting durations are committed in whole weeks.
pub const SECS_PER_WEEK: u64 = 7 * 24 * 60 * 60;
