//! Save codec: quest tracker state ↔ tagged JSON save record.
//!
//! - `export_record` / `export_tracker`: state → `SaveRecord`
//! - `encode_save`:  `SaveRecord` → JSON string (compact or pretty)
//! - `decode_save`:  JSON string → `LoadReport` (per-record tolerance)
//! - `save_to_file` / `load_from_file`: file I/O, atomic on save
//! - `save_hash`:    SHA-256 of an encoding (lowercase hex)
//!
//! Goals are rebuilt through `Goal::restore`, never by replaying
//! events. Dispatch is on the stored `kind` tag only.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use quest_engine::invariants::try_validate_state;
use quest_engine::{
    ChecklistState, Goal, GoalKind, GoalProgress, QuestTracker, TrackerState, UnknownKind,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failures that abort a whole save or load.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON serialization failed.
    #[error("SerializationError: {0}")]
    Serialization(String),
    /// The document is not a save record at all (bad JSON, missing or
    /// negative `totalScore`, `goals` not an array).
    #[error("DeserializationError: {0}")]
    Deserialization(String),
    /// File I/O error.
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One goal as persisted. Checklist counters are present only for
/// `Checklist` records and ignored for other kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub kind: GoalKind,
    pub name: String,
    pub description: String,
    pub points_per_event: i64,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<i64>,
}

/// Whole save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub total_score: u64,
    pub goals: Vec<GoalRecord>,
}

/// Top-level shape checked before any goal is decoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSave {
    total_score: u64,
    goals: Vec<Value>,
}

/// A goal record that was skipped during load. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// `kind` names no known goal variant.
    UnknownGoalKind { position: usize, kind: String },
    /// Missing field, wrong type, or a value outside its range.
    MalformedRecord { position: usize, reason: String },
}

impl LoadDiagnostic {
    pub fn position(&self) -> usize {
        match self {
            LoadDiagnostic::UnknownGoalKind { position, .. }
            | LoadDiagnostic::MalformedRecord { position, .. } => *position,
        }
    }
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDiagnostic::UnknownGoalKind { position, kind } => {
                write!(f, "UnknownGoalKind: record {} has kind {:?}", position, kind)
            }
            LoadDiagnostic::MalformedRecord { position, reason } => {
                write!(f, "MalformedRecord: record {}: {}", position, reason)
            }
        }
    }
}

/// Outcome of a load: the rebuilt state plus every skipped record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub state: TrackerState,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

fn goal_record(goal: &Goal) -> GoalRecord {
    let (target_count, current_count, bonus) = match goal.progress() {
        GoalProgress::Checklist {
            target_count,
            current_count,
            bonus,
        } => (
            Some(i64::from(*target_count)),
            Some(i64::from(*current_count)),
            Some(i64::from(*bonus)),
        ),
        _ => (None, None, None),
    };

    GoalRecord {
        kind: goal.kind(),
        name: goal.name().to_string(),
        description: goal.description().to_string(),
        points_per_event: i64::from(goal.points_per_event()),
        completed: goal.is_completed(),
        target_count,
        current_count,
        bonus,
    }
}

/// Build the save record for an exported state.
pub fn export_record(state: &TrackerState) -> SaveRecord {
    SaveRecord {
        total_score: state.total_score,
        goals: state.goals.iter().map(goal_record).collect(),
    }
}

/// Build the save record straight from a live tracker.
pub fn export_tracker(tracker: &QuestTracker) -> SaveRecord {
    SaveRecord {
        total_score: tracker.total_score(),
        goals: tracker.goals().iter().map(goal_record).collect(),
    }
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Encode a save record. Field order is fixed, so identical states
/// encode to identical bytes.
pub fn encode_save(record: &SaveRecord, pretty: bool) -> Result<String, CodecError> {
    let encoded = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    };
    encoded.map_err(|e| CodecError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

fn malformed(position: usize, reason: impl Into<String>) -> LoadDiagnostic {
    LoadDiagnostic::MalformedRecord {
        position,
        reason: reason.into(),
    }
}

/// Decode and restore one goal entry.
fn decode_goal(position: usize, value: Value) -> Result<Goal, LoadDiagnostic> {
    let kind = match value.get("kind") {
        None => return Err(malformed(position, "missing field `kind`")),
        Some(Value::String(name)) => {
            name.parse::<GoalKind>()
                .map_err(|UnknownKind(kind)| LoadDiagnostic::UnknownGoalKind { position, kind })?
        }
        Some(other) => {
            return Err(malformed(position, format!("`kind` must be a string, got {}", other)))
        }
    };

    let record: GoalRecord =
        serde_json::from_value(value).map_err(|e| malformed(position, e.to_string()))?;

    let checklist = match kind {
        GoalKind::Checklist => Some(ChecklistState {
            target_count: record
                .target_count
                .ok_or_else(|| malformed(position, "missing field `targetCount`"))?,
            current_count: record
                .current_count
                .ok_or_else(|| malformed(position, "missing field `currentCount`"))?,
            bonus: record
                .bonus
                .ok_or_else(|| malformed(position, "missing field `bonus`"))?,
        }),
        GoalKind::Simple | GoalKind::Eternal => None,
    };

    Goal::restore(
        kind,
        record.name,
        record.description,
        record.points_per_event,
        record.completed,
        checklist,
    )
    .map_err(|e| malformed(position, e.to_string()))
}

/// Decode a JSON save document.
///
/// Fails as a whole only when the document itself is unusable. Bad goal
/// records are skipped, logged, and listed in `LoadReport::diagnostics`;
/// `totalScore` is taken from the document either way.
pub fn decode_save(json: &str) -> Result<LoadReport, CodecError> {
    let raw: RawSave = serde_json::from_str(json)
        .map_err(|e| CodecError::Deserialization(e.to_string()))?;

    let mut goals = Vec::with_capacity(raw.goals.len());
    let mut diagnostics = Vec::new();

    for (position, value) in raw.goals.into_iter().enumerate() {
        match decode_goal(position, value) {
            Ok(goal) => goals.push(goal),
            Err(diagnostic) => {
                warn!("skipping goal record: {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    debug!(
        loaded = goals.len(),
        skipped = diagnostics.len(),
        "save decoded"
    );

    let state = TrackerState::new(raw.total_score, goals);
    try_validate_state(&state).map_err(CodecError::Deserialization)?;

    Ok(LoadReport { state, diagnostics })
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

/// Write a save record to `path`. Returns the SHA-256 of the bytes
/// written.
///
/// Stages into a temporary file in the destination directory, fsyncs,
/// then renames over `path`. On failure the previous file is untouched.
pub fn save_to_file(record: &SaveRecord, path: &Path, pretty: bool) -> Result<String, CodecError> {
    let json = encode_save(record, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(json.as_bytes())?;
    staged.flush()?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    info!("saved {} goals to {:?}", record.goals.len(), path);
    Ok(digest_hex(json.as_bytes()))
}

/// Read and decode a save file. The file handle is closed before
/// decoding starts.
pub fn load_from_file(path: &Path) -> Result<LoadReport, CodecError> {
    let content = fs::read_to_string(path)?;
    let report = decode_save(&content)?;
    info!(
        "loaded {} goals from {:?} ({} skipped)",
        report.state.goals.len(),
        path,
        report.diagnostics.len()
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Hash
// ---------------------------------------------------------------------------

fn digest_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// SHA-256 of the encoding `save_to_file` writes with the same `pretty`
/// flag. Lowercase hex string.
///
/// This hashes the save layout, not the kernel's canonical layout
/// (`quest_engine::hashing`); use it to check a save file was not
/// altered.
pub fn save_hash(record: &SaveRecord, pretty: bool) -> Result<String, CodecError> {
    Ok(digest_hex(encode_save(record, pretty)?.as_bytes()))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
