//! Repository for the `challenge_assignments` table (PRD-21).

use fintrack_core::challenges::{CHALLENGE_ACTIVE, CHALLENGE_COMPLETED};
use fintrack_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::challenge::ChallengeAssignment;

/// Column list for `challenge_assignments` queries.
const COLUMNS: &str = "id, user_id, challenge_id, month, current_value, progress_pct, \
                       status, completed_at, created_at, updated_at";

/// Month-scoped challenge assignments with one-shot completion.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Assign a challenge to a user for a month, if not already assigned.
    ///
    /// Returns `None` when the `(user_id, challenge_id, month)` row
    /// already exists, leaving its progress untouched.
    pub async fn assign(
        pool: &PgPool,
        user_id: DbId,
        challenge_id: &str,
        month: &str,
    ) -> Result<Option<ChallengeAssignment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenge_assignments (user_id, challenge_id, month, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, challenge_id, month) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeAssignment>(&query)
            .bind(user_id)
            .bind(challenge_id)
            .bind(month)
            .bind(CHALLENGE_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// List a user's assignments for a month, in assignment order.
    pub async fn for_month(
        pool: &PgPool,
        user_id: DbId,
        month: &str,
    ) -> Result<Vec<ChallengeAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM challenge_assignments \
             WHERE user_id = $1 AND month = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, ChallengeAssignment>(&query)
            .bind(user_id)
            .bind(month)
            .fetch_all(pool)
            .await
    }

    /// Refresh an assignment's displayed progress.
    ///
    /// Runs for completed assignments too: progress keeps tracking live
    /// metrics, while `status` is only changed by [`Self::try_complete_tx`].
    pub async fn refresh_progress_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        challenge_id: &str,
        month: &str,
        current_value: f64,
        progress_pct: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE challenge_assignments \
             SET current_value = $4, progress_pct = $5, updated_at = NOW() \
             WHERE user_id = $1 AND challenge_id = $2 AND month = $3",
        )
        .bind(user_id)
        .bind(challenge_id)
        .bind(month)
        .bind(current_value)
        .bind(progress_pct)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Flip an active assignment to completed.
    ///
    /// Returns `true` when this call performed the flip. The status
    /// guard in the WHERE clause makes completion one-shot under
    /// concurrent progress updates; a completed row never reverts.
    pub async fn try_complete_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        challenge_id: &str,
        month: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE challenge_assignments \
             SET status = $4, completed_at = NOW(), updated_at = NOW() \
             WHERE user_id = $1 AND challenge_id = $2 AND month = $3 AND status = $5",
        )
        .bind(user_id)
        .bind(challenge_id)
        .bind(month)
        .bind(CHALLENGE_COMPLETED)
        .bind(CHALLENGE_ACTIVE)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
