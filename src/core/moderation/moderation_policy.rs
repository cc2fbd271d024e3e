// Moderation policy - the numeric limits shared by the moderation commands.
//
// Most of these mirror hard limits on Discord's side, so checking them here
// gives users a clear message instead of an opaque API error.

use crate::core::time::{parse_duration, DAY_MS};
use thiserror::Error;

/// Discord refuses timeouts longer than 28 days.
pub const MAX_TIMEOUT_MS: u64 = 28 * DAY_MS;
/// Discord caps slowmode at 6 hours.
pub const MAX_SLOWMODE_SECS: u64 = 21_600;
/// Bulk delete only accepts messages younger than 14 days.
pub const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60;
pub const MAX_PURGE_AMOUNT: u8 = 100;
pub const MAX_BAN_DELETE_DAYS: u8 = 7;
pub const MAX_SEARCH_RESULTS: u8 = 5;
pub const DEFAULT_SEARCH_RESULTS: u8 = 3;
pub const DEFAULT_REASON: &str = "No reason provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DurationRejection {
    #[error("Invalid duration")]
    Invalid,

    #[error("Duration exceeds the allowed maximum")]
    TooLong,
}

/// Validate a mute duration. Returns milliseconds.
///
/// Zero is rejected here: a zero-length timeout would be a no-op.
pub fn timeout_duration(input: &str) -> Result<u64, DurationRejection> {
    let ms = parse_duration(input).ok_or(DurationRejection::Invalid)?;
    if ms == 0 {
        return Err(DurationRejection::Invalid);
    }
    if ms > MAX_TIMEOUT_MS {
        return Err(DurationRejection::TooLong);
    }
    Ok(ms)
}

/// Validate a slowmode duration. Returns whole seconds; `0` disables slowmode.
pub fn slowmode_seconds(input: &str) -> Result<u16, DurationRejection> {
    let ms = parse_duration(input).ok_or(DurationRejection::Invalid)?;
    let secs = ms / 1000;
    if secs > MAX_SLOWMODE_SECS {
        return Err(DurationRejection::TooLong);
    }
    // MAX_SLOWMODE_SECS fits in a u16.
    u16::try_from(secs).map_err(|_| DurationRejection::TooLong)
}

/// Whether a message created at `created_unix` can still be bulk deleted.
pub fn is_bulk_deletable(created_unix: i64, now_unix: i64) -> bool {
    now_unix - created_unix < BULK_DELETE_MAX_AGE_SECS
}

/// Fall back to the default audit-log reason for missing or blank input.
pub fn reason_or_default(reason: Option<String>) -> String {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_string())
}

/// Clamp the requested number of search results into 1..=5 (default 3).
pub fn search_result_limit(requested: Option<u8>) -> u8 {
    requested
        .unwrap_or(DEFAULT_SEARCH_RESULTS)
        .clamp(1, MAX_SEARCH_RESULTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_accepts_values_within_limit() {
        assert_eq!(timeout_duration("10m"), Ok(600_000));
        assert_eq!(timeout_duration("28d"), Ok(MAX_TIMEOUT_MS));
    }

    #[test]
    fn timeout_rejects_zero_and_garbage() {
        assert_eq!(timeout_duration("0s"), Err(DurationRejection::Invalid));
        assert_eq!(timeout_duration("soon"), Err(DurationRejection::Invalid));
    }

    #[test]
    fn timeout_rejects_past_discord_limit() {
        assert_eq!(timeout_duration("28d1s"), Err(DurationRejection::TooLong));
    }

    #[test]
    fn slowmode_allows_zero_to_disable() {
        assert_eq!(slowmode_seconds("0s"), Ok(0));
        assert_eq!(slowmode_seconds("5m"), Ok(300));
        assert_eq!(slowmode_seconds("6h"), Ok(21_600));
    }

    #[test]
    fn slowmode_rejects_over_six_hours() {
        assert_eq!(slowmode_seconds("6h1s"), Err(DurationRejection::TooLong));
        assert_eq!(slowmode_seconds("1d"), Err(DurationRejection::TooLong));
        assert_eq!(slowmode_seconds(""), Err(DurationRejection::Invalid));
    }

    #[test]
    fn bulk_delete_window_is_fourteen_days() {
        let now = 2_000_000_000;
        assert!(is_bulk_deletable(now - 60, now));
        assert!(!is_bulk_deletable(now - BULK_DELETE_MAX_AGE_SECS, now));
    }

    #[test]
    fn blank_reasons_fall_back_to_default() {
        assert_eq!(reason_or_default(None), DEFAULT_REASON);
        assert_eq!(reason_or_default(Some("   ".into())), DEFAULT_REASON);
        assert_eq!(reason_or_default(Some(" spam ".into())), "spam");
    }

    #[test]
    fn search_limit_is_clamped() {
        assert_eq!(search_result_limit(None), 3);
        assert_eq!(search_result_limit(Some(0)), 1);
        assert_eq!(search_result_limit(Some(9)), 5);
    }
}
