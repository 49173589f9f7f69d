//! Kernel error taxonomy.

use thiserror::Error;

/// Failures surfaced synchronously by goal construction and tracker
/// selection. None of them leave a tracker partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    /// Bad construction parameters; the goal never enters a tracker.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Goal selection outside `0..len`.
    #[error("goal index {index} out of range (tracker holds {len} goals)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Saved progress that no sequence of events could have produced.
    #[error("inconsistent goal state: {0}")]
    InconsistentState(String),
}
