//! Unlocked badge entity model (PRD-20).

use fintrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `unlocked_badges` table.
///
/// Unique on `(user_id, badge_id)`: the engine's core idempotency
/// contract for badge unlocks.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UnlockedBadge {
    pub id: DbId,
    pub user_id: DbId,
    pub badge_id: String,
    pub unlocked_at: Timestamp,
}
