//! XP actions, base award values, and award validation (PRD-18).
//!
//! Every XP award is tagged with an action key. A subset of actions carry
//! a fixed base value granted directly when the matching activity is
//! logged; the rest (milestones, badges, challenges) carry amounts defined
//! by their own catalogs.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Action keys
// ---------------------------------------------------------------------------

/// A transaction was logged.
pub const ACTION_TRANSACTION_LOGGED: &str = "transaction_logged";
/// A budget was created.
pub const ACTION_BUDGET_CREATED: &str = "budget_created";
/// A savings goal was created.
pub const ACTION_GOAL_CREATED: &str = "goal_created";
/// A savings goal was completed.
pub const ACTION_GOAL_COMPLETED: &str = "goal_completed";
/// An investment holding was added.
pub const ACTION_INVESTMENT_ADDED: &str = "investment_added";
/// A streak milestone was reached.
pub const ACTION_STREAK_MILESTONE: &str = "streak_milestone";
/// A badge was unlocked.
pub const ACTION_BADGE_UNLOCKED: &str = "badge_unlocked";
/// A monthly challenge was completed.
pub const ACTION_CHALLENGE_COMPLETED: &str = "challenge_completed";

/// All valid XP action keys.
pub const VALID_ACTIONS: &[&str] = &[
    ACTION_TRANSACTION_LOGGED,
    ACTION_BUDGET_CREATED,
    ACTION_GOAL_CREATED,
    ACTION_GOAL_COMPLETED,
    ACTION_INVESTMENT_ADDED,
    ACTION_STREAK_MILESTONE,
    ACTION_BADGE_UNLOCKED,
    ACTION_CHALLENGE_COMPLETED,
];

// ---------------------------------------------------------------------------
// Base award values
// ---------------------------------------------------------------------------

/// A fixed base XP value for a directly-triggered action, with the
/// ledger description used when it is granted.
pub struct ActionXp {
    pub action: &'static str,
    pub xp: i32,
    pub description: &'static str,
}

/// Base XP granted when the matching activity is logged.
///
/// Milestone, badge, and challenge actions are absent on purpose: their
/// amounts come from the milestone table, the engine configuration, and
/// the challenge templates respectively.
pub const BASE_ACTION_XP: &[ActionXp] = &[
    ActionXp {
        action: ACTION_TRANSACTION_LOGGED,
        xp: 5,
        description: "Logged a transaction",
    },
    ActionXp {
        action: ACTION_BUDGET_CREATED,
        xp: 10,
        description: "Created a budget",
    },
    ActionXp {
        action: ACTION_GOAL_CREATED,
        xp: 10,
        description: "Created a savings goal",
    },
    ActionXp {
        action: ACTION_GOAL_COMPLETED,
        xp: 50,
        description: "Completed a savings goal",
    },
    ActionXp {
        action: ACTION_INVESTMENT_ADDED,
        xp: 15,
        description: "Added an investment holding",
    },
];

/// Look up the base award for a directly-triggered action, if it has one.
pub fn base_award_for(action: &str) -> Option<&'static ActionXp> {
    BASE_ACTION_XP.iter().find(|a| a.action == action)
}

// ---------------------------------------------------------------------------
// Award validation
// ---------------------------------------------------------------------------

/// An XP award request, validated before any write occurs.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AwardRequest {
    pub action: String,
    /// Awarding zero or negative XP is a caller error, not a no-op.
    #[validate(range(min = 1, message = "XP amount must be a positive integer"))]
    pub amount: i32,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
}

/// Validate that an action key is one of the known actions.
pub fn validate_action(action: &str) -> Result<(), CoreError> {
    if VALID_ACTIONS.contains(&action) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown XP action: '{action}'. Valid actions: {}",
            VALID_ACTIONS.join(", ")
        )))
    }
}

/// Validate a full award request (field constraints plus action key).
pub fn validate_award(request: &AwardRequest) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_action(&request.action)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- action catalog -------------------------------------------------------

    #[test]
    fn all_base_actions_are_valid_actions() {
        for entry in BASE_ACTION_XP {
            assert!(
                VALID_ACTIONS.contains(&entry.action),
                "Base XP action '{}' missing from VALID_ACTIONS",
                entry.action
            );
        }
    }

    #[test]
    fn base_values_are_positive() {
        for entry in BASE_ACTION_XP {
            assert!(entry.xp > 0, "Action '{}' has non-positive XP", entry.action);
        }
    }

    #[test]
    fn base_award_lookup() {
        assert_eq!(base_award_for(ACTION_TRANSACTION_LOGGED).unwrap().xp, 5);
        assert_eq!(base_award_for(ACTION_GOAL_COMPLETED).unwrap().xp, 50);
        assert!(base_award_for(ACTION_BADGE_UNLOCKED).is_none());
        assert!(base_award_for("nonexistent").is_none());
    }

    // -- validate_action ------------------------------------------------------

    #[test]
    fn known_actions_accepted() {
        for action in VALID_ACTIONS {
            assert!(validate_action(action).is_ok());
        }
    }

    #[test]
    fn unknown_action_rejected() {
        assert!(validate_action("mystery_action").is_err());
        assert!(validate_action("").is_err());
    }

    // -- validate_award -------------------------------------------------------

    fn request(action: &str, amount: i32, description: &str) -> AwardRequest {
        AwardRequest {
            action: action.to_string(),
            amount,
            description: description.to_string(),
        }
    }

    #[test]
    fn valid_award_accepted() {
        let req = request(ACTION_TRANSACTION_LOGGED, 5, "Logged a transaction");
        assert!(validate_award(&req).is_ok());
    }

    #[test]
    fn zero_amount_rejected() {
        let req = request(ACTION_TRANSACTION_LOGGED, 0, "Nothing");
        assert!(validate_award(&req).is_err());
    }

    #[test]
    fn negative_amount_rejected() {
        let req = request(ACTION_TRANSACTION_LOGGED, -10, "Refund?");
        assert!(validate_award(&req).is_err());
    }

    #[test]
    fn empty_description_rejected() {
        let req = request(ACTION_TRANSACTION_LOGGED, 5, "");
        assert!(validate_award(&req).is_err());
    }

    #[test]
    fn unknown_action_in_request_rejected() {
        let req = request("mystery_action", 5, "???");
        assert!(validate_award(&req).is_err());
    }
}
