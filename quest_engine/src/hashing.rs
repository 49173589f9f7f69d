//! Canonical hashing.
//!
//! Deterministic canonical serialization + SHA-256 of tracker state.
//! Pins scenario outcomes in golden fixtures and lets two trackers be
//! compared without walking their goals.
//!
//! Rules:
//!   - Goals in tracker order (order is identity)
//!   - Fixed field order per goal; checklist counters only for checklists
//!   - UTF-8 JSON, no whitespace, integers only

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::goal::{Goal, GoalProgress};
use crate::state::TrackerState;
use crate::tracker::QuestTracker;
use crate::FORMAT_VERSION;

/// Canonical serialization of a tracker state to UTF-8 JSON bytes.
pub fn canonical_serialize(state: &TrackerState) -> Vec<u8> {
    serialize_parts(state.total_score, &state.goals)
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(state: &TrackerState) -> String {
    hex_digest(&canonical_serialize(state))
}

/// Canonical hash of a live tracker, without exporting it first.
pub fn tracker_hash(tracker: &QuestTracker) -> String {
    hex_digest(&serialize_parts(tracker.total_score(), tracker.goals()))
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn serialize_parts(total_score: u64, goals: &[Goal]) -> Vec<u8> {
    // A Value built from Map/Vec/str/u64 cannot fail to serialize.
    build_canonical_value(total_score, goals).to_string().into_bytes()
}

/// Field order: format_version, total_score, goals.
/// Per goal: kind, name, description, points_per_event, completed,
/// then target_count, current_count, bonus for checklists.
fn build_canonical_value(total_score: u64, goals: &[Goal]) -> Value {
    let goals_list: Vec<Value> = goals
        .iter()
        .map(|goal| {
            let mut g = Map::new();
            g.insert("kind".to_string(), Value::String(goal.kind().as_str().to_string()));
            g.insert("name".to_string(), Value::String(goal.name().to_string()));
            g.insert(
                "description".to_string(),
                Value::String(goal.description().to_string()),
            );
            g.insert(
                "points_per_event".to_string(),
                Value::Number(goal.points_per_event().into()),
            );
            g.insert("completed".to_string(), Value::Bool(goal.is_completed()));

            if let GoalProgress::Checklist {
                target_count,
                current_count,
                bonus,
            } = goal.progress()
            {
                g.insert("target_count".to_string(), Value::Number((*target_count).into()));
                g.insert("current_count".to_string(), Value::Number((*current_count).into()));
                g.insert("bonus".to_string(), Value::Number((*bonus).into()));
            }
            Value::Object(g)
        })
        .collect();

    let mut root = Map::new();
    root.insert(
        "format_version".to_string(),
        Value::Number(FORMAT_VERSION.into()),
    );
    root.insert("total_score".to_string(), Value::Number(total_score.into()));
    root.insert("goals".to_string(), Value::Array(goals_list));
    Value::Object(root)
}
