//! Repository for the `xp_accounts` and `xp_events` tables (PRD-18).

use fintrack_core::levels::level_for;
use fintrack_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::xp::{AwardOutcome, XpAccount, XpEvent};

/// Column list for `xp_accounts` queries.
const ACCOUNT_COLUMNS: &str = "user_id, total_xp, level, level_name, created_at, updated_at";

/// Column list for `xp_events` queries.
const EVENT_COLUMNS: &str = "id, user_id, action, xp_delta, description, created_at";

/// Append-only XP ledger with a derived per-user account snapshot.
pub struct XpRepo;

impl XpRepo {
    /// Award XP in its own transaction.
    ///
    /// Input validation (positive amount, known action) is the engine's
    /// job; this layer assumes a well-formed award.
    pub async fn award(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
        amount: i32,
        description: &str,
    ) -> Result<AwardOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let outcome = Self::award_tx(&mut tx, user_id, action, amount, description).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    /// Award XP inside a caller-owned transaction.
    ///
    /// Appends one `xp_events` row, then applies an atomic increment to
    /// the account total. The upsert's row lock is held until the caller
    /// commits, so concurrent awards for the same user serialize and the
    /// level recompute below always sees this transaction's own total.
    pub async fn award_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        action: &str,
        amount: i32,
        description: &str,
    ) -> Result<AwardOutcome, sqlx::Error> {
        sqlx::query(
            "INSERT INTO xp_events (user_id, action, xp_delta, description) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(action)
        .bind(amount)
        .bind(description)
        .execute(&mut **tx)
        .await?;

        let base = level_for(0);
        let new_total: i64 = sqlx::query_scalar(
            "INSERT INTO xp_accounts (user_id, total_xp, level, level_name) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 total_xp = xp_accounts.total_xp + EXCLUDED.total_xp, \
                 updated_at = NOW() \
             RETURNING total_xp",
        )
        .bind(user_id)
        .bind(amount as i64)
        .bind(base.level)
        .bind(base.name)
        .fetch_one(&mut **tx)
        .await?;

        let old_level = level_for(new_total - amount as i64);
        let new_level = level_for(new_total);
        sqlx::query(
            "UPDATE xp_accounts SET level = $2, level_name = $3, updated_at = NOW() \
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(new_level.level)
        .bind(new_level.name)
        .execute(&mut **tx)
        .await?;

        let leveled_up = new_level.level > old_level.level;
        if leveled_up {
            tracing::info!(
                user_id,
                level = new_level.level,
                level_name = new_level.name,
                "User leveled up",
            );
        }

        Ok(AwardOutcome {
            total_xp: new_total,
            level: new_level.level,
            level_name: new_level.name.to_string(),
            leveled_up,
        })
    }

    /// Fetch a user's account snapshot, if one exists yet.
    pub async fn get_account(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<XpAccount>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM xp_accounts WHERE user_id = $1");
        sqlx::query_as::<_, XpAccount>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's most recent XP events, newest first.
    pub async fn recent_events(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<XpEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM xp_events \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, XpEvent>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Sum of all event deltas for a user. Must always equal the
    /// account's `total_xp`; exposed for audit checks.
    pub async fn events_total(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(xp_delta), 0)::BIGINT FROM xp_events WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Count a user's events for one action key.
    pub async fn count_events_for_action(
        pool: &PgPool,
        user_id: DbId,
        action: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM xp_events WHERE user_id = $1 AND action = $2")
            .bind(user_id)
            .bind(action)
            .fetch_one(pool)
            .await
    }
}
