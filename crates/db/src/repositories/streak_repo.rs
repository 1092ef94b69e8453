//! Repository for the `streak_states` table (PRD-19).

use fintrack_core::streak::StreakSnapshot;
use fintrack_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::streak::{milestones_to_json, StreakState};

/// Column list for `streak_states` queries.
const COLUMNS: &str = "user_id, current_streak, longest_streak, last_activity_date, \
                       streak_start_date, freeze_tokens, milestones_reached, created_at, updated_at";

/// Per-user streak state with row-locked updates.
pub struct StreakRepo;

impl StreakRepo {
    /// Fetch a user's streak state, if any.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<StreakState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streak_states WHERE user_id = $1");
        sqlx::query_as::<_, StreakState>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a user's streak state under a row lock.
    ///
    /// Concurrent triggers for the same user block here until the holder
    /// commits, so a day transition is computed from committed state.
    pub async fn lock_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
    ) -> Result<Option<StreakState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streak_states WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, StreakState>(&query)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a full post-transition snapshot (insert or update).
    pub async fn save_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: DbId,
        snapshot: &StreakSnapshot,
    ) -> Result<StreakState, sqlx::Error> {
        let query = format!(
            "INSERT INTO streak_states \
                 (user_id, current_streak, longest_streak, last_activity_date, \
                  streak_start_date, freeze_tokens, milestones_reached) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 current_streak = EXCLUDED.current_streak, \
                 longest_streak = EXCLUDED.longest_streak, \
                 last_activity_date = EXCLUDED.last_activity_date, \
                 streak_start_date = EXCLUDED.streak_start_date, \
                 freeze_tokens = EXCLUDED.freeze_tokens, \
                 milestones_reached = EXCLUDED.milestones_reached, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreakState>(&query)
            .bind(user_id)
            .bind(snapshot.current_streak)
            .bind(snapshot.longest_streak)
            .bind(snapshot.last_activity_date)
            .bind(snapshot.streak_start_date)
            .bind(snapshot.freeze_tokens)
            .bind(milestones_to_json(&snapshot.milestones_reached))
            .fetch_one(&mut **tx)
            .await
    }

    /// Add freeze tokens to a user's balance.
    ///
    /// Token acquisition is decided by an external collaborator; this
    /// only applies the grant. Creates a baseline row (no activity yet)
    /// when the user has no streak state.
    pub async fn grant_freeze_tokens(
        pool: &PgPool,
        user_id: DbId,
        count: i32,
    ) -> Result<StreakState, sqlx::Error> {
        let query = format!(
            "INSERT INTO streak_states (user_id, freeze_tokens) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 freeze_tokens = streak_states.freeze_tokens + EXCLUDED.freeze_tokens, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let state = sqlx::query_as::<_, StreakState>(&query)
            .bind(user_id)
            .bind(count)
            .fetch_one(pool)
            .await?;
        tracing::debug!(user_id, count, balance = state.freeze_tokens, "Freeze tokens granted");
        Ok(state)
    }
}
