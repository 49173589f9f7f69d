//! Hand-written protobuf types for the activity ledger.
//!
//! Uses prost derive macros for encode/decode without prost-build.
//! Field numbers are part of the on-disk format; never renumber.

use prost::Message;

// ── Ledger Entry ───────────────────────────────────────────────

#[derive(Clone, PartialEq, Message)]
pub struct ProtoLedgerEntry {
    #[prost(uint64, tag = "1")]
    pub sequence: u64,
    #[prost(message, optional, tag = "2")]
    pub activity: Option<ProtoActivity>,
}

#[derive(Clone, PartialEq, Message)]
pub struct ProtoActivity {
    #[prost(oneof = "ActivityKind", tags = "1, 2, 3")]
    pub kind: Option<ActivityKind>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum ActivityKind {
    #[prost(message, tag = "1")]
    GoalAdded(GoalAdded),
    #[prost(message, tag = "2")]
    EventRecorded(EventRecorded),
    #[prost(message, tag = "3")]
    StateLoaded(StateLoaded),
}

// ── Goal Kind ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProtoGoalKind {
    Unspecified = 0,
    Simple = 1,
    Eternal = 2,
    Checklist = 3,
}

// ── Activity Types ─────────────────────────────────────────────

#[derive(Clone, PartialEq, Message)]
pub struct GoalAdded {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(enumeration = "ProtoGoalKind", tag = "2")]
    pub kind: i32,
    #[prost(string, tag = "3")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct EventRecorded {
    #[prost(uint64, tag = "1")]
    pub index: u64,
    #[prost(string, tag = "2")]
    pub goal_name: String,
    #[prost(uint64, tag = "3")]
    pub award: u64,
    #[prost(uint64, tag = "4")]
    pub total_score: u64,
    #[prost(uint64, tag = "5")]
    pub level: u64,
}

#[derive(Clone, PartialEq, Message)]
pub struct StateLoaded {
    #[prost(uint64, tag = "1")]
    pub total_score: u64,
    #[prost(uint64, tag = "2")]
    pub goal_count: u64,
    #[prost(uint64, tag = "3")]
    pub skipped: u64,
}
