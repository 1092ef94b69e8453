//! Repository for the `unlocked_badges` table (PRD-20).

use fintrack_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::badge::UnlockedBadge;

/// Column list for `unlocked_badges` queries.
const COLUMNS: &str = "id, user_id, badge_id, unlocked_at";

/// Append-only per-user badge unlock records.
pub struct BadgeRepo;

impl BadgeRepo {
    /// List a user's unlocked badge ids, oldest unlock first.
    pub async fn unlocked_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT badge_id FROM unlocked_badges WHERE user_id = $1 ORDER BY unlocked_at, id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// List a user's unlock records, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UnlockedBadge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM unlocked_badges \
             WHERE user_id = $1 \
             ORDER BY unlocked_at, id"
        );
        sqlx::query_as::<_, UnlockedBadge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record a badge unlock if it is not already recorded.
    ///
    /// Returns `true` when this call inserted the row. The unique
    /// constraint on `(user_id, badge_id)` makes the race between
    /// concurrent triggers resolve to exactly one winner, which is the
    /// only caller allowed to grant the unlock bonus.
    pub async fn try_unlock_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        badge_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO unlocked_badges (user_id, badge_id) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id, badge_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(badge_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Count a user's unlocked badges.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM unlocked_badges WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
