//! Activity ledger entries.
//!
//! What happened in a session, in order. Audit only: the save file is
//! the source of truth and the ledger is never replayed into a tracker.

use quest_engine::{EventOutcome, Goal, GoalKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    GoalAdded {
        index: usize,
        kind: GoalKind,
        name: String,
    },
    EventRecorded {
        index: usize,
        goal_name: String,
        award: u64,
        total_score: u64,
        level: u64,
    },
    StateLoaded {
        total_score: u64,
        goal_count: usize,
        skipped: usize,
    },
}

impl Activity {
    pub fn goal_added(index: usize, goal: &Goal) -> Self {
        Activity::GoalAdded {
            index,
            kind: goal.kind(),
            name: goal.name().to_string(),
        }
    }

    /// `total_score` and `level` are the tracker's values after the event.
    pub fn event_recorded(outcome: &EventOutcome, goal: &Goal, total_score: u64, level: u64) -> Self {
        Activity::EventRecorded {
            index: outcome.index,
            goal_name: goal.name().to_string(),
            award: outcome.award,
            total_score,
            level,
        }
    }
}

/// An activity with its ledger sequence number (1-based, gapless).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub sequence: u64,
    pub activity: Activity,
}
