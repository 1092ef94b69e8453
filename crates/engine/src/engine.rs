//! The gamification engine's trigger surface (PRD-18..21).
//!
//! One struct owns the pool, the configuration, and the metrics
//! provider. Per-user correctness rests on the persistence primitives:
//! atomic increments for XP totals, `FOR UPDATE` row locks for streak
//! transitions, unique-constraint inserts for badge unlocks, and
//! conditional status flips for challenge completion. Operations for
//! distinct users are fully independent.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use fintrack_core::badges::{evaluate, BadgeCategory, BADGES};
use fintrack_core::challenges::{
    current_value, month_key, progress_pct, template_by_id, validate_month_key,
};
use fintrack_core::error::CoreError;
use fintrack_core::levels::{level_for, LevelInfo};
use fintrack_core::metrics::MetricsBundle;
use fintrack_core::streak::{advance, milestone_xp};
use fintrack_core::types::{DbId, Timestamp};
use fintrack_core::xp::{
    base_award_for, validate_award, AwardRequest, ACTION_BADGE_UNLOCKED,
    ACTION_CHALLENGE_COMPLETED, ACTION_STREAK_MILESTONE,
};
use fintrack_db::models::challenge::ChallengeAssignment;
use fintrack_db::models::streak::StreakState;
use fintrack_db::models::xp::{AwardOutcome, XpEvent};
use fintrack_db::repositories::{BadgeRepo, ChallengeRepo, StreakRepo, XpRepo};

use crate::assign::rotation_for;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::metrics::MetricsProvider;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a streak update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakResult {
    pub current_streak: i32,
    pub longest_streak: i32,
    /// False only when the same calendar day had already been recorded.
    pub is_new: bool,
}

/// Result of one activity trigger.
#[derive(Debug, Clone)]
pub struct ActivityOutcome {
    pub streak: StreakResult,
    /// Badge ids newly unlocked by this trigger.
    pub new_badges: Vec<&'static str>,
}

/// A catalog badge joined with a user's unlock state, for display.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BadgeStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub unlocked_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Rules-evaluation core turning raw financial activity into XP, levels,
/// streaks, badges, and challenge progress.
pub struct GamificationEngine<M> {
    pool: PgPool,
    config: EngineConfig,
    metrics: M,
}

impl<M: MetricsProvider> GamificationEngine<M> {
    /// Create an engine with default configuration.
    pub fn new(pool: PgPool, metrics: M) -> Self {
        Self::with_config(pool, metrics, EngineConfig::default())
    }

    pub fn with_config(pool: PgPool, metrics: M, config: EngineConfig) -> Self {
        Self {
            pool,
            config,
            metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- activity pipeline --------------------------------------------------

    /// Run the full per-activity pipeline for today:
    /// streak update, base XP, badge evaluation, challenge progress.
    pub async fn handle_activity(
        &self,
        user_id: DbId,
        action: &str,
    ) -> EngineResult<ActivityOutcome> {
        self.handle_activity_on(user_id, action, Utc::now().date_naive())
            .await
    }

    /// Run the full per-activity pipeline for an explicit activity date.
    ///
    /// The metrics bundle is fetched before any mutation: a provider
    /// failure aborts the whole trigger with no state change. Badge and
    /// challenge evaluation then read the just-updated streak counters,
    /// which are patched into the bundle after the streak step.
    pub async fn handle_activity_on(
        &self,
        user_id: DbId,
        action: &str,
        today: NaiveDate,
    ) -> EngineResult<ActivityOutcome> {
        fintrack_core::xp::validate_action(action)?;
        let mut bundle = self.metrics.metrics_for(user_id).await?;

        let streak = self.update_streak_on(user_id, today).await?;
        bundle.current_streak = i64::from(streak.current_streak);
        bundle.longest_streak = i64::from(streak.longest_streak);

        if let Some(base) = base_award_for(action) {
            self.award_xp(user_id, base.action, base.xp, base.description)
                .await?;
        }

        let new_badges = self.check_badge_unlocks(user_id, &bundle).await?;
        self.update_challenge_progress_in(user_id, &month_key(today), &bundle)
            .await?;

        Ok(ActivityOutcome { streak, new_badges })
    }

    // -- XP ledger ----------------------------------------------------------

    /// Award XP to a user.
    ///
    /// Validates the request (known action, positive amount, non-empty
    /// description) before any write. Safe to call concurrently for the
    /// same user: the account increment is atomic.
    pub async fn award_xp(
        &self,
        user_id: DbId,
        action: &str,
        amount: i32,
        description: &str,
    ) -> EngineResult<AwardOutcome> {
        let request = AwardRequest {
            action: action.to_string(),
            amount,
            description: description.to_string(),
        };
        validate_award(&request)?;

        let outcome = XpRepo::award(&self.pool, user_id, action, amount, description).await?;
        tracing::debug!(
            user_id,
            action,
            amount,
            total_xp = outcome.total_xp,
            "XP awarded",
        );
        Ok(outcome)
    }

    /// Current level information for a user, from their persisted total.
    /// A user with no account yet reads as level 1 with 0 XP.
    pub async fn account_overview(&self, user_id: DbId) -> EngineResult<LevelInfo> {
        let total = XpRepo::get_account(&self.pool, user_id)
            .await?
            .map(|account| account.total_xp)
            .unwrap_or(0);
        Ok(level_for(total))
    }

    /// A user's most recent ledger entries, newest first.
    pub async fn recent_events(&self, user_id: DbId, limit: i64) -> EngineResult<Vec<XpEvent>> {
        Ok(XpRepo::recent_events(&self.pool, user_id, limit).await?)
    }

    // -- streak tracker -----------------------------------------------------

    /// Record activity for today and apply the streak transition.
    pub async fn update_streak(&self, user_id: DbId) -> EngineResult<StreakResult> {
        self.update_streak_on(user_id, Utc::now().date_naive()).await
    }

    /// Record activity for an explicit date and apply the streak
    /// transition, awarding any newly reached milestones in the same
    /// transaction as the state write.
    pub async fn update_streak_on(
        &self,
        user_id: DbId,
        today: NaiveDate,
    ) -> EngineResult<StreakResult> {
        let mut tx = self.pool.begin().await?;

        let row = StreakRepo::lock_tx(&mut tx, user_id).await?;
        let previous = row.as_ref().and_then(|r| r.snapshot());
        let mut transition = advance(previous.as_ref(), today)?;

        // A freeze-token grant may have created the row before the first
        // activity; carry its balance into the fresh streak state.
        if previous.is_none() {
            if let Some(row) = &row {
                transition.state.freeze_tokens = row.freeze_tokens;
            }
        }

        let result = StreakResult {
            current_streak: transition.state.current_streak,
            longest_streak: transition.state.longest_streak,
            is_new: transition.is_new,
        };

        // Same-day re-trigger: return existing counters, persist nothing.
        if !transition.is_new {
            return Ok(result);
        }

        StreakRepo::save_tx(&mut tx, user_id, &transition.state).await?;
        for days in &transition.new_milestones {
            if let Some(xp) = milestone_xp(*days) {
                XpRepo::award_tx(
                    &mut tx,
                    user_id,
                    ACTION_STREAK_MILESTONE,
                    xp,
                    &format!("Reached a {days}-day streak"),
                )
                .await?;
            }
        }
        tx.commit().await?;

        if transition.consumed_freeze_token {
            tracing::info!(user_id, "Streak preserved by a freeze token");
        }
        for days in &transition.new_milestones {
            tracing::info!(user_id, milestone_days = days, "Streak milestone reached");
        }

        Ok(result)
    }

    /// A user's raw streak state, if any.
    pub async fn streak_state(&self, user_id: DbId) -> EngineResult<Option<StreakState>> {
        Ok(StreakRepo::get(&self.pool, user_id).await?)
    }

    /// Add freeze tokens to a user's balance and return the new balance.
    /// Token acquisition policy belongs to the caller.
    pub async fn grant_freeze_tokens(&self, user_id: DbId, count: i32) -> EngineResult<i32> {
        if count <= 0 {
            return Err(CoreError::Validation(format!(
                "Freeze token grant must be positive, got {count}"
            ))
            .into());
        }
        let state = StreakRepo::grant_freeze_tokens(&self.pool, user_id, count).await?;
        Ok(state.freeze_tokens)
    }

    // -- badge evaluator ----------------------------------------------------

    /// Evaluate every badge the user has not yet unlocked against the
    /// supplied metrics, recording unlocks and granting the unlock bonus
    /// exactly once each. Returns the badge ids newly unlocked by this
    /// call, in catalog order.
    ///
    /// Composite badges sit after their prerequisites in the catalog, so
    /// one pass can cascade-unlock them.
    pub async fn check_badge_unlocks(
        &self,
        user_id: DbId,
        metrics: &MetricsBundle,
    ) -> EngineResult<Vec<&'static str>> {
        let mut unlocked: HashSet<String> = BadgeRepo::unlocked_ids(&self.pool, user_id)
            .await?
            .into_iter()
            .collect();

        let mut new_badges = Vec::new();
        for badge in BADGES {
            if unlocked.contains(badge.id) {
                continue;
            }
            if !evaluate(badge, metrics, &unlocked) {
                continue;
            }

            let mut tx = self.pool.begin().await?;
            let inserted = BadgeRepo::try_unlock_tx(&mut tx, user_id, badge.id).await?;
            if inserted {
                XpRepo::award_tx(
                    &mut tx,
                    user_id,
                    ACTION_BADGE_UNLOCKED,
                    self.config.badge_unlock_xp,
                    &format!("Unlocked badge: {}", badge.name),
                )
                .await?;
            }
            tx.commit().await?;

            if inserted {
                tracing::info!(user_id, badge_id = badge.id, "Badge unlocked");
                new_badges.push(badge.id);
            }
            // Either way the badge is unlocked now (a concurrent trigger
            // may have won the insert); composites later in the pass
            // should see it.
            unlocked.insert(badge.id.to_string());
        }

        Ok(new_badges)
    }

    /// The full badge catalog joined with the user's unlock state.
    pub async fn badges_with_status(&self, user_id: DbId) -> EngineResult<Vec<BadgeStatus>> {
        let unlocked: HashMap<String, Timestamp> = BadgeRepo::list_for_user(&self.pool, user_id)
            .await?
            .into_iter()
            .map(|record| (record.badge_id, record.unlocked_at))
            .collect();

        Ok(BADGES
            .iter()
            .map(|badge| BadgeStatus {
                id: badge.id,
                name: badge.name,
                description: badge.description,
                category: badge.category,
                unlocked_at: unlocked.get(badge.id).copied(),
            })
            .collect())
    }

    // -- challenge tracker --------------------------------------------------

    /// Recompute challenge progress for the current month from freshly
    /// fetched metrics. Progress and completion state are read back via
    /// [`Self::assignments_for_month`], not returned here.
    pub async fn update_challenge_progress(&self, user_id: DbId) -> EngineResult<()> {
        let bundle = self.metrics.metrics_for(user_id).await?;
        self.update_challenge_progress_in(user_id, &month_key(Utc::now().date_naive()), &bundle)
            .await
    }

    /// Recompute challenge progress for one month from a caller-supplied
    /// bundle. Ensures the month's assignments exist, refreshes every
    /// assignment's progress, and grants each completion reward at most
    /// once.
    pub async fn update_challenge_progress_in(
        &self,
        user_id: DbId,
        month: &str,
        bundle: &MetricsBundle,
    ) -> EngineResult<()> {
        validate_month_key(month)?;

        for template in rotation_for(user_id, month, self.config.challenges_per_month) {
            ChallengeRepo::assign(&self.pool, user_id, template.id, month).await?;
        }

        for assignment in ChallengeRepo::for_month(&self.pool, user_id, month).await? {
            let Some(template) = template_by_id(&assignment.challenge_id) else {
                tracing::warn!(
                    user_id,
                    challenge_id = %assignment.challenge_id,
                    "Assignment references a template missing from the pool",
                );
                continue;
            };

            let current = current_value(template.metric, bundle);
            let pct = progress_pct(current, template.target);

            let mut tx = self.pool.begin().await?;
            ChallengeRepo::refresh_progress_tx(
                &mut tx,
                user_id,
                template.id,
                month,
                current,
                pct,
            )
            .await?;

            if current >= template.target {
                let completed_now =
                    ChallengeRepo::try_complete_tx(&mut tx, user_id, template.id, month).await?;
                if completed_now {
                    XpRepo::award_tx(
                        &mut tx,
                        user_id,
                        ACTION_CHALLENGE_COMPLETED,
                        template.xp_reward,
                        &format!("Completed challenge: {}", template.name),
                    )
                    .await?;
                    tracing::info!(user_id, challenge_id = template.id, "Challenge completed");
                }
            }
            tx.commit().await?;
        }

        Ok(())
    }

    /// A user's challenge assignments for a month, in assignment order.
    pub async fn assignments_for_month(
        &self,
        user_id: DbId,
        month: &str,
    ) -> EngineResult<Vec<ChallengeAssignment>> {
        validate_month_key(month)?;
        Ok(ChallengeRepo::for_month(&self.pool, user_id, month).await?)
    }
}
