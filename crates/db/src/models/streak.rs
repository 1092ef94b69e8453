//! Streak state entity model (PRD-19).

use chrono::NaiveDate;
use fintrack_core::streak::StreakSnapshot;
use fintrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `streak_states` table.
///
/// The activity dates are nullable because a freeze-token grant may
/// create the row before the user's first activity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreakState {
    pub user_id: DbId,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    pub streak_start_date: Option<NaiveDate>,
    pub freeze_tokens: i32,
    /// JSON array of milestone thresholds already awarded.
    pub milestones_reached: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StreakState {
    /// Convert to the core snapshot form.
    ///
    /// Returns `None` until the user has logged a first activity (a row
    /// created only by a token grant has no activity dates yet).
    pub fn snapshot(&self) -> Option<StreakSnapshot> {
        let last_activity_date = self.last_activity_date?;
        let streak_start_date = self.streak_start_date?;
        Some(StreakSnapshot {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_activity_date,
            streak_start_date,
            freeze_tokens: self.freeze_tokens,
            milestones_reached: milestones_from_json(&self.milestones_reached),
        })
    }
}

/// Parse a stored milestone array, tolerating missing or malformed data.
pub fn milestones_from_json(value: &serde_json::Value) -> Vec<i32> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

/// Serialize a milestone list for storage.
pub fn milestones_to_json(milestones: &[i32]) -> serde_json::Value {
    serde_json::json!(milestones)
}
