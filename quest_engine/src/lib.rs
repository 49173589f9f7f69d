#![forbid(unsafe_code)]

//! Quest engine kernel.
//!
//! Goal variants, the quest tracker that owns them, and the pure
//! checks and hashing used to pin tracker state. No I/O lives here.

/// Version of the canonical state layout. Bound into every state hash.
pub const FORMAT_VERSION: u32 = 1;

pub mod arithmetic;
pub mod error;
pub mod goal;
pub mod events;
pub mod state;
pub mod invariants;
pub mod hashing;
pub mod tracker;
pub mod scenario;

pub use error::QuestError;
pub use events::{EventOutcome, ScoreUpdate};
pub use goal::{ChecklistParams, ChecklistState, Goal, GoalDescriptor, GoalKind, GoalProgress, UnknownKind};
pub use state::TrackerState;
pub use tracker::QuestTracker;
