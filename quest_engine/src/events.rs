//! Outcomes of tracker mutations.
//!
//! Pure data. The tracker produces these; callers decide how to
//! present them (menu text, logs, the activity ledger).

use serde::Serialize;

/// Result of adding points to the tracker's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub points: u64,
    pub total_score: u64,
    pub previous_level: u64,
    pub level: u64,
}

impl ScoreUpdate {
    /// Level to announce under the reference cadence: every update
    /// once the level is at least 1, whether or not it changed.
    pub fn level_notice(&self) -> Option<u64> {
        (self.level > 0).then_some(self.level)
    }

    /// True only on the update that moved the level up.
    pub fn crossed_level(&self) -> bool {
        self.level > self.previous_level
    }
}

/// Result of recording one event against a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOutcome {
    pub index: usize,
    /// Points earned. Zero is a valid result (already-completed goal).
    pub award: u64,
    /// The goal went from open to completed on this event.
    pub completed_now: bool,
    /// Present only when `award > 0`.
    pub score: Option<ScoreUpdate>,
}
