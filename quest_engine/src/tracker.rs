//! Quest tracker.
//!
//! Owns the ordered goal sequence and the cumulative score. Goals are
//! addressed by position; there is no removal, so positions are stable.
//!
//! `record_event(index)`:
//!   1. Resolve the index (out of range: error, nothing changes)
//!   2. Delegate to the goal's `record_event`
//!   3. Re-check the goal's invariants
//!   4. Add a non-zero award to the score and compute the level

use tracing::{debug, info};

use crate::arithmetic::{add_points, level_for_score, DEFAULT_LEVEL_THRESHOLD};
use crate::error::QuestError;
use crate::events::{EventOutcome, ScoreUpdate};
use crate::goal::{Goal, GoalDescriptor};
use crate::invariants::{validate_goal, validate_state};
use crate::state::TrackerState;

/// Aggregate of goals and score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestTracker {
    goals: Vec<Goal>,
    total_score: u64,
    level_threshold: u64,
}

impl Default for QuestTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestTracker {
    /// Empty tracker, one level per 1000 points.
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            total_score: 0,
            level_threshold: DEFAULT_LEVEL_THRESHOLD,
        }
    }

    /// Empty tracker with a custom points-per-level threshold.
    pub fn with_level_threshold(level_threshold: u64) -> Result<Self, QuestError> {
        if level_threshold == 0 {
            return Err(QuestError::InvalidConfiguration(
                "level threshold must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            level_threshold,
            ..Self::new()
        })
    }

    /// Rebuild a tracker around previously exported state.
    pub fn from_state(state: TrackerState) -> Self {
        let mut tracker = Self::new();
        tracker.import(state);
        tracker
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    pub fn level_threshold(&self) -> u64 {
        self.level_threshold
    }

    /// Current level: `total_score / level_threshold`.
    pub fn level(&self) -> u64 {
        level_for_score(self.total_score, self.level_threshold)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, index: usize) -> Option<&Goal> {
        self.goals.get(index)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    // ── Mutation ───────────────────────────────────────────────────

    /// Append a goal. Returns its index.
    pub fn add_goal(&mut self, goal: Goal) -> usize {
        debug!(kind = %goal.kind(), name = goal.name(), "goal added");
        self.goals.push(goal);
        self.goals.len() - 1
    }

    /// Record one event against the goal at `index`.
    ///
    /// A zero award is a valid outcome and leaves the score alone.
    pub fn record_event(&mut self, index: usize) -> Result<EventOutcome, QuestError> {
        let len = self.goals.len();
        let goal = self
            .goals
            .get_mut(index)
            .ok_or(QuestError::IndexOutOfRange { index, len })?;

        let was_completed = goal.is_completed();
        let award = goal.record_event();
        validate_goal(goal);
        let completed_now = !was_completed && goal.is_completed();

        debug!(
            index,
            goal = goal.name(),
            award,
            completed_now,
            "event recorded"
        );

        let score = if award > 0 {
            Some(self.add_score(award))
        } else {
            None
        };

        Ok(EventOutcome {
            index,
            award,
            completed_now,
            score,
        })
    }

    /// Add points to the total and report the resulting level.
    ///
    /// The level notice is logged on every call once level >= 1, not
    /// only when it changes; `ScoreUpdate::crossed_level` gives the
    /// crossing-only view.
    pub fn add_score(&mut self, points: u64) -> ScoreUpdate {
        let previous_level = self.level();
        self.total_score = add_points(self.total_score, points);

        let update = ScoreUpdate {
            points,
            total_score: self.total_score,
            previous_level,
            level: self.level(),
        };

        if let Some(level) = update.level_notice() {
            info!(level, total_score = self.total_score, "level reached");
        }
        update
    }

    // ── Views ──────────────────────────────────────────────────────

    /// Descriptors in goal order. Lazy; call again to restart.
    pub fn list_goals(&self) -> impl Iterator<Item = GoalDescriptor> + '_ {
        self.goals.iter().map(Goal::display)
    }

    // ── Wholesale state ────────────────────────────────────────────

    /// Copy of the score and goals.
    pub fn export(&self) -> TrackerState {
        TrackerState {
            total_score: self.total_score,
            goals: self.goals.clone(),
        }
    }

    /// Replace score and goals. The level threshold is configuration
    /// and is kept.
    pub fn import(&mut self, state: TrackerState) {
        validate_state(&state);
        debug!(
            total_score = state.total_score,
            goals = state.goals.len(),
            "tracker state replaced"
        );
        self.total_score = state.total_score;
        self.goals = state.goals;
    }
}
