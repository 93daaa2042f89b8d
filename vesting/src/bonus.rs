//! Pure bonus and penalty math.
//!
//! Kept free of lifecycle state so the tables can be exhaustively tested in
//! isolation. All rates are parts of `RATE_DENOMINATOR`; all arithmetic is
//! checked and fails closed on overflow.

use crate::error::VestingError;
use crate::position::PositionState;
use vesta_types::{Timestamp, RATE_DENOMINATOR};

/// The vest-bonus cap, reached at 52 committed weeks.
pub const MAX_VEST_BONUS: u128 = 6_000;

/// Vest-bonus rate for a committed duration in whole weeks.
///
/// Monotone non-decreasing step function, capped at [`MAX_VEST_BONUS`] for
/// durations of 52 weeks and beyond.
pub fn vest_bonus(duration_weeks: u64) -> u128 {
    match duration_weeks {
        0..=3 => 0,
        4..=12 => 500,
        13..=25 => 1_500,
        26..=38 => 3_000,
        39..=51 => 4_500,
        _ => MAX_VEST_BONUS,
    }
}

/// Stability rate a position earns on a claim.
///
/// The matured rate needs the position itself Matured and every top-up
/// past its own maturity horizon; anything else earns the default.
pub fn rsi_for_position(
    state: PositionState,
    all_top_ups_matured: bool,
    matured_rsi: u128,
    default_rsi: u128,
) -> u128 {
    if state == PositionState::Matured && all_top_ups_matured {
        matured_rsi
    } else {
        default_rsi
    }
}

/// Apply the bonus multipliers to a raw reward delta:
/// `raw * (base + vest_bonus) * rsi / RATE_DENOMINATOR^2`.
pub fn apply_multipliers(
    raw: u128,
    base_rate: u128,
    vest_bonus: u128,
    rsi: u128,
) -> Result<u128, VestingError> {
    let combined = base_rate
        .checked_add(vest_bonus)
        .ok_or(VestingError::Overflow)?;
    let scaled = raw
        .checked_mul(combined)
        .and_then(|x| x.checked_mul(rsi))
        .ok_or(VestingError::Overflow)?;
    Ok(scaled / (RATE_DENOMINATOR * RATE_DENOMINATOR))
}

/// Early-exit penalty for cutting `amount` while still Active:
/// `amount * (end - now) / duration`, clamped to `[0, amount]`.
///
/// The complementary payout is `amount - penalty`, so penalty + payout
/// reconstruct the cut amount exactly.
pub fn early_exit_penalty(
    amount: u128,
    now: Timestamp,
    end: Timestamp,
    duration_secs: u64,
) -> Result<u128, VestingError> {
    if duration_secs == 0 {
        return Ok(0);
    }
    let remaining = end
        .as_secs()
        .saturating_sub(now.as_secs())
        .min(duration_secs) as u128;
    let penalty = amount
        .checked_mul(remaining)
        .ok_or(VestingError::Overflow)?
        / duration_secs as u128;
    Ok(penalty.min(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vest_bonus_table_is_exhaustive_and_monotone() {
        let mut prev = 0;
        for weeks in 0..=120 {
            let bonus = vest_bonus(weeks);
            assert!(bonus >= prev, "bonus decreased at {weeks} weeks");
            assert!(bonus <= MAX_VEST_BONUS);
            prev = bonus;
        }
    }

    #[test]
    fn vest_bonus_bucket_boundaries() {
        assert_eq!(vest_bonus(0), 0);
        assert_eq!(vest_bonus(3), 0);
        assert_eq!(vest_bonus(4), 500);
        assert_eq!(vest_bonus(12), 500);
        assert_eq!(vest_bonus(13), 1_500);
        assert_eq!(vest_bonus(25), 1_500);
        assert_eq!(vest_bonus(26), 3_000);
        assert_eq!(vest_bonus(38), 3_000);
        assert_eq!(vest_bonus(39), 4_500);
        assert_eq!(vest_bonus(51), 4_500);
        assert_eq!(vest_bonus(52), MAX_VEST_BONUS);
        assert_eq!(vest_bonus(u64::MAX), MAX_VEST_BONUS);
    }

    #[test]
    fn matured_rate_needs_full_maturity() {
        assert_eq!(rsi_for_position(PositionState::Matured, true, 15_000, 10_000), 15_000);
        assert_eq!(rsi_for_position(PositionState::Matured, false, 15_000, 10_000), 10_000);
        assert_eq!(rsi_for_position(PositionState::Maturing, true, 15_000, 10_000), 10_000);
        assert_eq!(rsi_for_position(PositionState::Active, true, 15_000, 10_000), 10_000);
    }

    #[test]
    fn neutral_multipliers_are_identity() {
        // base 1.0×, no vest bonus, RSI 1.0× must pass the raw value through.
        assert_eq!(
            apply_multipliers(123_456, RATE_DENOMINATOR, 0, RATE_DENOMINATOR).unwrap(),
            123_456
        );
    }

    #[test]
    fn max_multipliers_scale_up() {
        // (1.0 + 0.6) * 1.5 = 2.4×
        assert_eq!(
            apply_multipliers(1_000, RATE_DENOMINATOR, MAX_VEST_BONUS, 15_000).unwrap(),
            2_400
        );
    }

    #[test]
    fn multiplier_overflow_fails_closed() {
        assert_eq!(
            apply_multipliers(u128::MAX, RATE_DENOMINATOR, 0, RATE_DENOMINATOR),
            Err(VestingError::Overflow)
        );
    }

    #[test]
    fn penalty_decays_linearly() {
        let end = Timestamp::new(1_000);
        // Full duration remaining: everything is penalized.
        assert_eq!(early_exit_penalty(400, Timestamp::new(0), end, 1_000).unwrap(), 400);
        // Midpoint: half the cut amount.
        assert_eq!(early_exit_penalty(400, Timestamp::new(500), end, 1_000).unwrap(), 200);
        // At the end: no penalty.
        assert_eq!(early_exit_penalty(400, Timestamp::new(1_000), end, 1_000).unwrap(), 0);
    }

    #[test]
    fn penalty_clamped_past_end() {
        let end = Timestamp::new(1_000);
        assert_eq!(early_exit_penalty(400, Timestamp::new(5_000), end, 1_000).unwrap(), 0);
    }

    #[test]
    fn penalty_overflow_fails_closed() {
        // Adversarially large unstake amount must not wrap.
        let end = Timestamp::new(u64::MAX);
        assert_eq!(
            early_exit_penalty(u128::MAX, Timestamp::new(0), end, u64::MAX),
            Err(VestingError::Overflow)
        );
    }

    #[test]
    fn zero_duration_has_no_penalty() {
        assert_eq!(
            early_exit_penalty(400, Timestamp::new(0), Timestamp::new(0), 0).unwrap(),
            0
        );
    }
}
