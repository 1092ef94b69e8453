//! Challenge assignment entity model (PRD-21).

use fintrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `challenge_assignments` table, keyed by
/// `(user_id, challenge_id, month)`.
///
/// `current_value` and `progress_pct` keep refreshing after completion
/// for display; `status` never reverts from completed within a month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChallengeAssignment {
    pub id: DbId,
    pub user_id: DbId,
    pub challenge_id: String,
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub current_value: f64,
    pub progress_pct: f64,
    pub status: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
