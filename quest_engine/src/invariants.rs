//! Goal invariant checks.
//!
//! Constructors already refuse unreachable states, so a failure here
//! means a kernel bug. The tracker runs `validate_goal` after every
//! event and `validate_state` on import, and panics; the save codec
//! runs `try_validate_state` on every decoded document.
//!
//! Checks:
//!   - target_positive: checklist `targetCount >= 1`
//!   - count_bounds:    checklist `currentCount <= targetCount`
//!   - completion:      checklist completed iff `currentCount == targetCount`
//!   - eternal_open:    eternal goals never report completion

use crate::goal::{Goal, GoalProgress};
use crate::state::TrackerState;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check one goal. Panics on the first failure.
pub fn validate_goal(goal: &Goal) {
    if let Err(msg) = try_validate_goal(goal) {
        panic!("Invariant violation: {}", msg);
    }
}

/// Check every goal in a state. Panics on the first failure.
pub fn validate_state(state: &TrackerState) {
    if let Err(msg) = try_validate_state(state) {
        panic!("Invariant violation: {}", msg);
    }
}

/// Non-panicking `validate_goal`.
pub fn try_validate_goal(goal: &Goal) -> Result<(), String> {
    check_target_positive(goal)?;
    check_count_bounds(goal)?;
    check_completion(goal)?;
    check_eternal_open(goal)?;
    Ok(())
}

/// Non-panicking `validate_state`. The message names the goal position.
pub fn try_validate_state(state: &TrackerState) -> Result<(), String> {
    for (index, goal) in state.goals.iter().enumerate() {
        try_validate_goal(goal).map_err(|msg| format!("goal #{}: {}", index, msg))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

/// A checklist needs at least one event to complete.
fn check_target_positive(goal: &Goal) -> Result<(), String> {
    if let GoalProgress::Checklist { target_count, .. } = goal.progress() {
        if *target_count == 0 {
            return Err(format!(
                "[INVARIANT:target_positive] Checklist goal {:?} has targetCount 0",
                goal.name()
            ));
        }
    }
    Ok(())
}

/// `0 <= currentCount <= targetCount`.
fn check_count_bounds(goal: &Goal) -> Result<(), String> {
    if let GoalProgress::Checklist {
        target_count,
        current_count,
        ..
    } = goal.progress()
    {
        if current_count > target_count {
            return Err(format!(
                "[INVARIANT:count_bounds] Checklist goal {:?} has currentCount {} above targetCount {}",
                goal.name(),
                current_count,
                target_count
            ));
        }
    }
    Ok(())
}

/// The completion flag agrees with the checklist counters.
fn check_completion(goal: &Goal) -> Result<(), String> {
    if let GoalProgress::Checklist {
        target_count,
        current_count,
        ..
    } = goal.progress()
    {
        if goal.is_completed() != (current_count == target_count) {
            return Err(format!(
                "[INVARIANT:completion] Checklist goal {:?} reports completed={} at {}/{}",
                goal.name(),
                goal.is_completed(),
                current_count,
                target_count
            ));
        }
    }
    Ok(())
}

fn check_eternal_open(goal: &Goal) -> Result<(), String> {
    if matches!(goal.progress(), GoalProgress::Eternal) && goal.is_completed() {
        return Err(format!(
            "[INVARIANT:eternal_open] Eternal goal {:?} reports completion",
            goal.name()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{ChecklistState, GoalKind};

    #[test]
    fn test_fresh_and_progressed_goals_pass() {
        let mut checklist = Goal::checklist("a", "b", 1, 2, 0).unwrap();
        validate_goal(&checklist);
        checklist.record_event();
        checklist.record_event();
        checklist.record_event();
        validate_goal(&checklist);

        let state = TrackerState::new(
            10,
            vec![
                Goal::simple("s", "d", 1).unwrap(),
                Goal::eternal("e", "d", 1).unwrap(),
                checklist,
            ],
        );
        assert_eq!(try_validate_state(&state), Ok(()));
    }

    #[test]
    fn test_restored_goals_pass_every_check() {
        let done = Goal::restore(
            GoalKind::Checklist,
            "t",
            "d",
            5,
            true,
            Some(ChecklistState {
                target_count: 2,
                current_count: 2,
                bonus: 10,
            }),
        )
        .unwrap();
        let simple = Goal::restore(GoalKind::Simple, "s", "d", 5, true, None).unwrap();
        let eternal = Goal::restore(GoalKind::Eternal, "e", "d", 5, false, None).unwrap();

        for goal in [&done, &simple, &eternal] {
            assert_eq!(try_validate_goal(goal), Ok(()));
        }
        validate_state(&TrackerState::new(0, vec![done, simple, eternal]));
    }
}
