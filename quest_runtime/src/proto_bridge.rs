//! Proto ↔ activity conversion bridge.
//!
//! Converts between the ledger's protobuf wire types (proto_types.rs)
//! and the session-level `Activity` values (activity.rs).

use quest_engine::GoalKind;

use crate::activity::{Activity, LedgerEntry};
use crate::proto_types::*;

fn kind_to_proto(kind: GoalKind) -> ProtoGoalKind {
    match kind {
        GoalKind::Simple => ProtoGoalKind::Simple,
        GoalKind::Eternal => ProtoGoalKind::Eternal,
        GoalKind::Checklist => ProtoGoalKind::Checklist,
    }
}

fn kind_from_proto(raw: i32) -> Result<GoalKind, String> {
    match ProtoGoalKind::try_from(raw) {
        Ok(ProtoGoalKind::Simple) => Ok(GoalKind::Simple),
        Ok(ProtoGoalKind::Eternal) => Ok(GoalKind::Eternal),
        Ok(ProtoGoalKind::Checklist) => Ok(GoalKind::Checklist),
        _ => Err(format!("unknown goal kind {} in ledger entry", raw)),
    }
}

/// Wrap an activity in a ledger frame with the given sequence number.
pub fn activity_to_proto(sequence: u64, activity: &Activity) -> ProtoLedgerEntry {
    let kind = match activity {
        Activity::GoalAdded { index, kind, name } => ActivityKind::GoalAdded(GoalAdded {
            index: *index as u64,
            kind: kind_to_proto(*kind) as i32,
            name: name.clone(),
        }),
        Activity::EventRecorded {
            index,
            goal_name,
            award,
            total_score,
            level,
        } => ActivityKind::EventRecorded(EventRecorded {
            index: *index as u64,
            goal_name: goal_name.clone(),
            award: *award,
            total_score: *total_score,
            level: *level,
        }),
        Activity::StateLoaded {
            total_score,
            goal_count,
            skipped,
        } => ActivityKind::StateLoaded(StateLoaded {
            total_score: *total_score,
            goal_count: *goal_count as u64,
            skipped: *skipped as u64,
        }),
    };

    ProtoLedgerEntry {
        sequence,
        activity: Some(ProtoActivity { kind: Some(kind) }),
    }
}

/// Convert a decoded ledger frame back into a `LedgerEntry`.
///
/// Frames without an activity, or with an unknown goal kind, are
/// rejected rather than skipped: the ledger is written only by us.
pub fn proto_to_activity(proto: &ProtoLedgerEntry) -> Result<LedgerEntry, String> {
    let kind = proto
        .activity
        .as_ref()
        .and_then(|a| a.kind.as_ref())
        .ok_or_else(|| format!("ledger entry {} has no activity", proto.sequence))?;

    let activity = match kind {
        ActivityKind::GoalAdded(g) => Activity::GoalAdded {
            index: g.index as usize,
            kind: kind_from_proto(g.kind)?,
            name: g.name.clone(),
        },
        ActivityKind::EventRecorded(e) => Activity::EventRecorded {
            index: e.index as usize,
            goal_name: e.goal_name.clone(),
            award: e.award,
            total_score: e.total_score,
            level: e.level,
        },
        ActivityKind::StateLoaded(s) => Activity::StateLoaded {
            total_score: s.total_score,
            goal_count: s.goal_count as usize,
            skipped: s.skipped as usize,
        },
    };

    Ok(LedgerEntry {
        sequence: proto.sequence,
        activity,
    })
}
