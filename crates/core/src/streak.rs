//! Daily streak state machine and milestone table (PRD-19).
//!
//! Transitions are keyed by calendar day, not wall-clock time. A streak
//! survives a single missed day when a freeze token is available; any
//! larger gap resets it. Milestones enter `milestones_reached` at most
//! once, which is what makes their XP awards one-shot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Milestone table
// ---------------------------------------------------------------------------

/// A streak milestone and the XP it awards when first reached.
pub struct MilestoneDefinition {
    pub days: i32,
    pub xp: i32,
}

/// Milestone thresholds in ascending order.
pub const STREAK_MILESTONES: &[MilestoneDefinition] = &[
    MilestoneDefinition { days: 7, xp: 50 },
    MilestoneDefinition { days: 30, xp: 150 },
    MilestoneDefinition { days: 100, xp: 500 },
    MilestoneDefinition {
        days: 365,
        xp: 2_000,
    },
];

/// Look up the XP value for a milestone threshold.
pub fn milestone_xp(days: i32) -> Option<i32> {
    STREAK_MILESTONES
        .iter()
        .find(|m| m.days == days)
        .map(|m| m.xp)
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// A user's streak state as of their last recorded activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSnapshot {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: NaiveDate,
    pub streak_start_date: NaiveDate,
    pub freeze_tokens: i32,
    /// Milestone thresholds already awarded, sorted ascending.
    pub milestones_reached: Vec<i32>,
}

impl StreakSnapshot {
    /// State created by a user's very first activity.
    pub fn first_activity(today: NaiveDate) -> Self {
        Self {
            current_streak: 1,
            longest_streak: 1,
            last_activity_date: today,
            streak_start_date: today,
            freeze_tokens: 0,
            milestones_reached: Vec::new(),
        }
    }
}

/// The outcome of applying one day's activity to a streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakTransition {
    /// Post-transition state to persist.
    pub state: StreakSnapshot,
    /// False only for a same-day re-trigger, which changes nothing.
    pub is_new: bool,
    /// A freeze token was spent to bridge a one-day gap.
    pub consumed_freeze_token: bool,
    /// Milestone thresholds newly reached by this transition, ascending.
    pub new_milestones: Vec<i32>,
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Apply an activity on `today` to the previous streak state.
///
/// `previous = None` means the user has never logged an activity. An
/// activity date before the last recorded one is rejected: the last
/// activity date never moves backward.
pub fn advance(
    previous: Option<&StreakSnapshot>,
    today: NaiveDate,
) -> Result<StreakTransition, CoreError> {
    let Some(prev) = previous else {
        let mut state = StreakSnapshot::first_activity(today);
        let new_milestones = collect_new_milestones(&mut state);
        return Ok(StreakTransition {
            state,
            is_new: true,
            consumed_freeze_token: false,
            new_milestones,
        });
    };

    let gap = (today - prev.last_activity_date).num_days();
    if gap < 0 {
        return Err(CoreError::Validation(format!(
            "Activity date {today} is before the last recorded activity {}",
            prev.last_activity_date
        )));
    }

    // Same-day re-trigger: counters are already up to date for today.
    if gap == 0 {
        return Ok(StreakTransition {
            state: prev.clone(),
            is_new: false,
            consumed_freeze_token: false,
            new_milestones: Vec::new(),
        });
    }

    let mut state = prev.clone();
    state.last_activity_date = today;

    let consumed_freeze_token = match gap {
        1 => {
            state.current_streak += 1;
            false
        }
        // A single missed day survives if a freeze token is available.
        2 if state.freeze_tokens > 0 => {
            state.freeze_tokens -= 1;
            state.current_streak += 1;
            true
        }
        _ => {
            state.current_streak = 1;
            state.streak_start_date = today;
            false
        }
    };

    state.longest_streak = state.longest_streak.max(state.current_streak);
    let new_milestones = collect_new_milestones(&mut state);

    Ok(StreakTransition {
        state,
        is_new: true,
        consumed_freeze_token,
        new_milestones,
    })
}

/// Record every milestone threshold the current streak now meets that has
/// not been reached before. Returns the newly recorded thresholds.
fn collect_new_milestones(state: &mut StreakSnapshot) -> Vec<i32> {
    let mut new_milestones = Vec::new();
    for milestone in STREAK_MILESTONES {
        if state.current_streak >= milestone.days
            && !state.milestones_reached.contains(&milestone.days)
        {
            state.milestones_reached.push(milestone.days);
            new_milestones.push(milestone.days);
        }
    }
    state.milestones_reached.sort_unstable();
    new_milestones
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
