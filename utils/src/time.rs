//! Duration formatting and conversion for positions quoted in weeks.

use vesta_types::SECS_PER_WEEK;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Render a duration the way vesting commitments are quoted: whole weeks
/// first, then the remainder.
pub fn format_duration(secs: u64) -> String {
    if secs >= SECS_PER_WEEK {
        let weeks = secs / SECS_PER_WEEK;
        let days = (secs % SECS_PER_WEEK) / SECS_PER_DAY;
        if days == 0 {
            format!("{weeks}w")
        } else {
            format!("{weeks}w {days}d")
        }
    } else if secs >= SECS_PER_DAY {
        format!("{}d {}h", secs / SECS_PER_DAY, (secs % SECS_PER_DAY) / 3_600)
    } else if secs >= 3_600 {
        format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60)
    } else {
        format!("{secs}s")
    }
}

/// Convert a whole-week commitment to seconds, saturating at `u64::MAX`.
pub fn weeks_to_secs(weeks: u64) -> u64 {
    weeks.saturating_mul(SECS_PER_WEEK)
}
