//! Quest session: the operations an interactive front end drives.
//!
//! Owns one tracker, its configuration and an optional activity ledger.
//! Single owner, synchronous; every call runs to completion.
//!
//! Mutate-before-log order:
//!   1. tracker mutation   (may fail: bad parameters, bad index)
//!   2. ledger append      (only if step 1 succeeded)
//!
//! An error from an operation means the tracker did not change. Once
//! step 1 has succeeded the operation succeeds; a failed ledger append
//! is logged at `warn` and the ledger simply misses that entry.
//!
//! Load is all-or-nothing at the document level: the tracker is
//! replaced only after the whole file was read and decoded.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use quest_engine::hashing::tracker_hash;
use quest_engine::{
    ChecklistParams, EventOutcome, Goal, GoalDescriptor, GoalKind, QuestError, QuestTracker,
};

use crate::activity::{Activity, LedgerEntry};
use crate::config::{ConfigError, QuestConfig};
use crate::ledger::ActivityLedger;
use crate::proto_bridge::{activity_to_proto, proto_to_activity};
use crate::save_codec::{export_tracker, load_from_file, save_to_file, CodecError, LoadDiagnostic};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Quest(#[from] QuestError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("ledger error: {0}")]
    Ledger(#[from] io::Error),
}

pub struct QuestSession {
    tracker: QuestTracker,
    config: QuestConfig,
    ledger: Option<ActivityLedger>,
}

impl QuestSession {
    /// Start an empty session. Opens (or creates) the ledger if one is
    /// configured.
    pub fn new(config: QuestConfig) -> Result<Self, SessionError> {
        let tracker = QuestTracker::with_level_threshold(config.level_threshold)?;
        let ledger = config
            .ledger_file
            .as_deref()
            .map(ActivityLedger::open)
            .transpose()?;

        Ok(Self {
            tracker,
            config,
            ledger,
        })
    }

    /// Session configured from a TOML file (defaults when it is absent).
    pub fn from_config_file(path: &Path) -> Result<Self, SessionError> {
        Self::new(QuestConfig::load_or_default(path)?)
    }

    pub fn tracker(&self) -> &QuestTracker {
        &self.tracker
    }

    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    pub fn total_score(&self) -> u64 {
        self.tracker.total_score()
    }

    pub fn level(&self) -> u64 {
        self.tracker.level()
    }

    pub fn current_hash(&self) -> String {
        tracker_hash(&self.tracker)
    }

    pub fn list_goals(&self) -> impl Iterator<Item = GoalDescriptor> + '_ {
        self.tracker.list_goals()
    }

    fn log(&mut self, activity: Activity) {
        let Some(ledger) = self.ledger.as_mut() else {
            return;
        };
        let sequence = ledger.next_sequence();
        if let Err(e) = ledger.append(&activity_to_proto(sequence, &activity)) {
            warn!(path = ?ledger.path(), sequence, error = %e, "ledger append failed");
        }
    }

    // ── Operations ─────────────────────────────────────────────────

    /// Build a goal through the validating factory and append it.
    /// Returns the new goal's index.
    pub fn create_goal(
        &mut self,
        kind: GoalKind,
        name: &str,
        description: &str,
        points_per_event: i64,
        checklist: Option<ChecklistParams>,
    ) -> Result<usize, SessionError> {
        let goal = Goal::create(kind, name, description, points_per_event, checklist)?;
        let activity = Activity::goal_added(self.tracker.len(), &goal);
        let index = self.tracker.add_goal(goal);
        self.log(activity);
        Ok(index)
    }

    pub fn record_event(&mut self, index: usize) -> Result<EventOutcome, SessionError> {
        let outcome = self.tracker.record_event(index)?;

        if let Some(goal) = self.tracker.goal(index) {
            let activity = Activity::event_recorded(
                &outcome,
                goal,
                self.tracker.total_score(),
                self.tracker.level(),
            );
            self.log(activity);
        }
        Ok(outcome)
    }

    /// Write the current state to `path`. Returns the SHA-256 of the
    /// file contents written.
    pub fn save(&self, path: &Path) -> Result<String, SessionError> {
        let record = export_tracker(&self.tracker);
        Ok(save_to_file(&record, path, self.config.pretty_saves)?)
    }

    /// Replace the tracker with the contents of `path`.
    ///
    /// Skipped records come back as diagnostics. If the file cannot be
    /// read or is not a save document, the tracker is left as it was.
    pub fn load(&mut self, path: &Path) -> Result<Vec<LoadDiagnostic>, SessionError> {
        let report = load_from_file(path)?;

        let activity = Activity::StateLoaded {
            total_score: report.state.total_score,
            goal_count: report.state.goals.len(),
            skipped: report.diagnostics.len(),
        };
        self.tracker.import(report.state);
        info!(
            total_score = self.tracker.total_score(),
            goals = self.tracker.len(),
            "session state loaded"
        );
        self.log(activity);
        Ok(report.diagnostics)
    }

    pub fn save_default(&self) -> Result<String, SessionError> {
        self.save(&self.config.save_file)
    }

    pub fn load_default(&mut self) -> Result<Vec<LoadDiagnostic>, SessionError> {
        let path = self.config.save_file.clone();
        self.load(&path)
    }

    /// Ledger contents in order. Empty when no ledger is configured.
    pub fn ledger_entries(&self) -> Result<Vec<LedgerEntry>, SessionError> {
        let Some(ledger) = self.ledger.as_ref() else {
            return Ok(Vec::new());
        };
        ledger
            .read_all()?
            .iter()
            .map(|proto| {
                proto_to_activity(proto)
                    .map_err(|msg| SessionError::Ledger(io::Error::new(io::ErrorKind::InvalidData, msg)))
            })
            .collect()
    }
}
