//! Tracker state container.
//!
//! The wholesale unit of `QuestTracker::export` / `import`: the score
//! and the ordered goal sequence, nothing else.

use crate::goal::Goal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub total_score: u64,
    pub goals: Vec<Goal>,
}

impl TrackerState {
    pub fn new(total_score: u64, goals: Vec<Goal>) -> Self {
        Self { total_score, goals }
    }
}
