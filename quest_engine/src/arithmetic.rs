//! Score arithmetic.
//!
//! Integer only. Construction inputs arrive signed and are narrowed
//! here, so negative values are rejected rather than wrapped.

use crate::error::QuestError;

/// Points per level unless a tracker is configured otherwise.
pub const DEFAULT_LEVEL_THRESHOLD: u64 = 1000;

/// Add an award to a score. Saturates at `u64::MAX`, never decreases.
pub fn add_points(score: u64, points: u64) -> u64 {
    score.saturating_add(points)
}

/// Level reached at `score`: `score / threshold`, floored.
/// A zero threshold never levels.
pub fn level_for_score(score: u64, threshold: u64) -> u64 {
    if threshold == 0 {
        return 0;
    }
    score / threshold
}

/// Narrow a signed parameter to `u32`. Rejects negatives and overflow.
pub fn non_negative(field: &str, value: i64) -> Result<u32, QuestError> {
    u32::try_from(value).map_err(|_| {
        QuestError::InvalidConfiguration(format!(
            "{} must be between 0 and {}, got {}",
            field,
            u32::MAX,
            value
        ))
    })
}

/// Like [`non_negative`], but zero is rejected too.
pub fn positive(field: &str, value: i64) -> Result<u32, QuestError> {
    match non_negative(field, value)? {
        0 => Err(QuestError::InvalidConfiguration(format!(
            "{} must be greater than 0, got 0",
            field
        ))),
        v => Ok(v),
    }
}
