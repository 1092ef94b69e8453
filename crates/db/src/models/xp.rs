//! XP ledger entity models (PRD-18).

use fintrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `xp_accounts` table.
///
/// `level` and `level_name` are derived from `total_xp` on every write;
/// they are stored for cheap reads, never updated independently.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct XpAccount {
    pub user_id: DbId,
    pub total_xp: i64,
    pub level: i32,
    pub level_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the append-only `xp_events` table. Never mutated or
/// deleted; the account total must always equal the sum of these rows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct XpEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub xp_delta: i32,
    pub description: String,
    pub created_at: Timestamp,
}

/// Result of one XP award.
#[derive(Debug, Clone, Serialize)]
pub struct AwardOutcome {
    pub total_xp: i64,
    pub level: i32,
    pub level_name: String,
    pub leveled_up: bool,
}
