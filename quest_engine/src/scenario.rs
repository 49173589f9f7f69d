//! Scenario fixtures.
//!
//! A scenario is a list of goal definitions plus a script of goal
//! indices, replayed through a fresh tracker. Fixtures pin the final
//! score, level and canonical hash so behavior changes show up as
//! hash drift.

use serde::Deserialize;

use crate::arithmetic::DEFAULT_LEVEL_THRESHOLD;
use crate::error::QuestError;
use crate::goal::{ChecklistParams, Goal, GoalKind};
use crate::tracker::QuestTracker;

/// Goal definition as written in a fixture.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoalSpec {
    pub kind: GoalKind,
    pub name: String,
    pub description: String,
    pub points_per_event: i64,
    #[serde(default)]
    pub target_count: Option<i64>,
    #[serde(default)]
    pub bonus: Option<i64>,
}

impl GoalSpec {
    /// Build through the public factory, so fixtures get the same
    /// validation as interactive input.
    pub fn build(&self) -> Result<Goal, QuestError> {
        let checklist = match (self.target_count, self.bonus) {
            (Some(target_count), Some(bonus)) => Some(ChecklistParams {
                target_count,
                bonus,
            }),
            _ => None,
        };
        Goal::create(
            self.kind,
            self.name.as_str(),
            self.description.as_str(),
            self.points_per_event,
            checklist,
        )
    }
}

fn default_level_threshold() -> u64 {
    DEFAULT_LEVEL_THRESHOLD
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default = "default_level_threshold")]
    pub level_threshold: u64,
    pub goals: Vec<GoalSpec>,
    pub events: Vec<usize>,
    pub expected_score: u64,
    #[serde(default)]
    pub expected_level: Option<u64>,
    #[serde(default)]
    pub expected_hash: Option<String>,
}

impl Scenario {
    /// Replay the scenario into a fresh tracker.
    pub fn run(&self) -> Result<QuestTracker, QuestError> {
        let mut tracker = QuestTracker::with_level_threshold(self.level_threshold)?;
        for spec in &self.goals {
            tracker.add_goal(spec.build()?);
        }
        for &index in &self.events {
            tracker.record_event(index)?;
        }
        Ok(tracker)
    }
}

/// Parse a JSON array of scenarios.
pub fn load_scenarios(json: &str) -> Result<Vec<Scenario>, serde_json::Error> {
    serde_json::from_str(json)
}
