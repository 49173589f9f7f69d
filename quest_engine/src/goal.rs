//! Goal variants.
//!
//! A goal is the shared identity (name, description, points per event)
//! plus a closed `GoalProgress` enum carrying per-variant state. The
//! variant is fixed at construction and is the only kind tag the save
//! codec dispatches on.
//!
//! Two ways in:
//!   - `Goal::create` and shorthands: fresh goals, zero progress
//!   - `Goal::restore`: saved goals, progress set directly from a record
//!
//! Progress changes afterwards only through `record_event`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::arithmetic::{non_negative, positive};
use crate::error::QuestError;

// ── Kind tag ───────────────────────────────────────────────────────

/// The closed set of goal behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalKind {
    /// One-shot; completes on its first event.
    Simple,
    /// Repeatable forever; never completes.
    Eternal,
    /// Completes after a fixed number of events, with a bonus.
    Checklist,
}

impl GoalKind {
    pub const ALL: [GoalKind; 3] = [GoalKind::Simple, GoalKind::Eternal, GoalKind::Checklist];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalKind::Simple => "Simple",
            GoalKind::Eternal => "Eternal",
            GoalKind::Checklist => "Checklist",
        }
    }
}

/// A kind name outside the closed set. Carries the rejected name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown goal kind {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for GoalKind {
    type Err = UnknownKind;

    /// Exact, case-sensitive match on the tag names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Simple" => Ok(GoalKind::Simple),
            "Eternal" => Ok(GoalKind::Eternal),
            "Checklist" => Ok(GoalKind::Checklist),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Construction inputs ────────────────────────────────────────────

/// Checklist parameters for a fresh goal, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistParams {
    pub target_count: i64,
    pub bonus: i64,
}

/// Checklist counters read back from a save record, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistState {
    pub target_count: i64,
    pub current_count: i64,
    pub bonus: i64,
}

// ── Goal ───────────────────────────────────────────────────────────

/// Per-variant progress state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalProgress {
    Simple {
        completed: bool,
    },
    Eternal,
    /// Completed exactly when `current_count == target_count`.
    Checklist {
        target_count: u32,
        current_count: u32,
        bonus: u32,
    },
}

/// A single goal owned by a quest tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    name: String,
    description: String,
    points_per_event: u32,
    progress: GoalProgress,
}

/// Structured progress view of a goal. Formatting is left to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDescriptor {
    pub kind: GoalKind,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub points_per_event: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<u32>,
}

impl Goal {
    /// Build a fresh goal of `kind` with no progress.
    ///
    /// Fails with `InvalidConfiguration` when `points_per_event < 0`, or,
    /// for `Checklist`, when parameters are missing, `target_count <= 0`
    /// or `bonus < 0`. Checklist parameters passed for other kinds are
    /// ignored.
    pub fn create(
        kind: GoalKind,
        name: impl Into<String>,
        description: impl Into<String>,
        points_per_event: i64,
        checklist: Option<ChecklistParams>,
    ) -> Result<Self, QuestError> {
        let points_per_event = non_negative("pointsPerEvent", points_per_event)?;

        let progress = match kind {
            GoalKind::Simple => GoalProgress::Simple { completed: false },
            GoalKind::Eternal => GoalProgress::Eternal,
            GoalKind::Checklist => {
                let params = checklist.ok_or_else(|| {
                    QuestError::InvalidConfiguration(
                        "checklist goal requires targetCount and bonus".to_string(),
                    )
                })?;
                GoalProgress::Checklist {
                    target_count: positive("targetCount", params.target_count)?,
                    current_count: 0,
                    bonus: non_negative("bonus", params.bonus)?,
                }
            }
        };

        Ok(Self {
            name: name.into(),
            description: description.into(),
            points_per_event,
            progress,
        })
    }

    pub fn simple(
        name: impl Into<String>,
        description: impl Into<String>,
        points_per_event: i64,
    ) -> Result<Self, QuestError> {
        Self::create(GoalKind::Simple, name, description, points_per_event, None)
    }

    pub fn eternal(
        name: impl Into<String>,
        description: impl Into<String>,
        points_per_event: i64,
    ) -> Result<Self, QuestError> {
        Self::create(GoalKind::Eternal, name, description, points_per_event, None)
    }

    pub fn checklist(
        name: impl Into<String>,
        description: impl Into<String>,
        points_per_event: i64,
        target_count: i64,
        bonus: i64,
    ) -> Result<Self, QuestError> {
        Self::create(
            GoalKind::Checklist,
            name,
            description,
            points_per_event,
            Some(ChecklistParams {
                target_count,
                bonus,
            }),
        )
    }

    /// Rebuild a goal from saved state without replaying events.
    ///
    /// `completed` and the checklist counters are taken as given, after
    /// checking they describe a reachable state:
    ///   - Checklist: `0 <= current_count <= target_count`, `target_count > 0`,
    ///     `bonus >= 0`, `completed == (current_count == target_count)`
    ///   - Eternal: `completed == false`
    pub fn restore(
        kind: GoalKind,
        name: impl Into<String>,
        description: impl Into<String>,
        points_per_event: i64,
        completed: bool,
        checklist: Option<ChecklistState>,
    ) -> Result<Self, QuestError> {
        let points_per_event = non_negative("pointsPerEvent", points_per_event)?;

        let progress = match kind {
            GoalKind::Simple => GoalProgress::Simple { completed },
            GoalKind::Eternal => {
                if completed {
                    return Err(QuestError::InconsistentState(
                        "eternal goal cannot be completed".to_string(),
                    ));
                }
                GoalProgress::Eternal
            }
            GoalKind::Checklist => {
                let saved = checklist.ok_or_else(|| {
                    QuestError::InconsistentState(
                        "checklist goal requires targetCount, currentCount and bonus".to_string(),
                    )
                })?;
                let target_count = positive("targetCount", saved.target_count)?;
                let current_count = non_negative("currentCount", saved.current_count)?;
                let bonus = non_negative("bonus", saved.bonus)?;

                if current_count > target_count {
                    return Err(QuestError::InconsistentState(format!(
                        "currentCount {} exceeds targetCount {}",
                        current_count, target_count
                    )));
                }
                if completed != (current_count == target_count) {
                    return Err(QuestError::InconsistentState(format!(
                        "completed={} disagrees with progress {}/{}",
                        completed, current_count, target_count
                    )));
                }
                GoalProgress::Checklist {
                    target_count,
                    current_count,
                    bonus,
                }
            }
        };

        Ok(Self {
            name: name.into(),
            description: description.into(),
            points_per_event,
            progress,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn kind(&self) -> GoalKind {
        match self.progress {
            GoalProgress::Simple { .. } => GoalKind::Simple,
            GoalProgress::Eternal => GoalKind::Eternal,
            GoalProgress::Checklist { .. } => GoalKind::Checklist,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn points_per_event(&self) -> u32 {
        self.points_per_event
    }

    pub fn progress(&self) -> &GoalProgress {
        &self.progress
    }

    /// Eternal goals always report `false`.
    pub fn is_completed(&self) -> bool {
        match self.progress {
            GoalProgress::Simple { completed } => completed,
            GoalProgress::Eternal => false,
            GoalProgress::Checklist {
                target_count,
                current_count,
                ..
            } => current_count == target_count,
        }
    }

    /// Events still needed to complete. `None` for eternal goals.
    pub fn remaining(&self) -> Option<u32> {
        match self.progress {
            GoalProgress::Simple { completed } => Some(if completed { 0 } else { 1 }),
            GoalProgress::Eternal => None,
            GoalProgress::Checklist {
                target_count,
                current_count,
                ..
            } => Some(target_count - current_count),
        }
    }

    // ── Behavior ───────────────────────────────────────────────────

    /// Record one occurrence and return the points it earns.
    ///
    /// Never fails. A completed goal yields 0 and is left untouched.
    /// The checklist bonus is paid on the event that reaches the target,
    /// in the same call that completes the goal.
    pub fn record_event(&mut self) -> u64 {
        let points = u64::from(self.points_per_event);

        match &mut self.progress {
            GoalProgress::Simple { completed } => {
                if *completed {
                    debug!(goal = %self.name, "simple goal already completed");
                    return 0;
                }
                *completed = true;
                points
            }
            GoalProgress::Eternal => points,
            GoalProgress::Checklist {
                target_count,
                current_count,
                bonus,
            } => {
                if *current_count >= *target_count {
                    debug!(goal = %self.name, "checklist goal already completed");
                    return 0;
                }
                *current_count += 1;
                if *current_count == *target_count {
                    points + u64::from(*bonus)
                } else {
                    points
                }
            }
        }
    }

    /// Progress descriptor for listing.
    pub fn display(&self) -> GoalDescriptor {
        let (current_count, target_count, bonus) = match self.progress {
            GoalProgress::Checklist {
                target_count,
                current_count,
                bonus,
            } => (Some(current_count), Some(target_count), Some(bonus)),
            _ => (None, None, None),
        };

        GoalDescriptor {
            kind: self.kind(),
            name: self.name.clone(),
            description: self.description.clone(),
            completed: self.is_completed(),
            points_per_event: self.points_per_event,
            current_count,
            target_count,
            bonus,
        }
    }
}
