//! Integration tests for the XP ledger repository.
//!
//! Exercises the append-only event log and the derived account snapshot
//! against a real database:
//! - Lazy account creation on first award
//! - The sum invariant (total equals the sum of event deltas)
//! - Level recomputation and the leveled_up flag
//! - Event ordering and audit helpers

use fintrack_core::xp::{ACTION_BADGE_UNLOCKED, ACTION_TRANSACTION_LOGGED};
use fintrack_db::repositories::XpRepo;
use sqlx::PgPool;

const USER: i64 = 101;

// ---------------------------------------------------------------------------
// Test: first award creates the account
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_award_creates_account(pool: PgPool) {
    let outcome = XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "Logged a transaction")
        .await
        .unwrap();
    assert_eq!(outcome.total_xp, 5);
    assert_eq!(outcome.level, 1);
    assert_eq!(outcome.level_name, "Budgeting Beginner");
    assert!(!outcome.leveled_up);

    let account = XpRepo::get_account(&pool, USER).await.unwrap().unwrap();
    assert_eq!(account.total_xp, 5);
    assert_eq!(account.level, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_account_reads_as_none(pool: PgPool) {
    assert!(XpRepo::get_account(&pool, 999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: sum invariant holds across award sequences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_total_equals_sum_of_events(pool: PgPool) {
    let amounts = [5, 10, 25, 50, 5, 5];
    for amount in amounts {
        XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, amount, "Activity")
            .await
            .unwrap();
    }

    let account = XpRepo::get_account(&pool, USER).await.unwrap().unwrap();
    let events_total = XpRepo::events_total(&pool, USER).await.unwrap();
    assert_eq!(account.total_xp, amounts.iter().map(|a| *a as i64).sum::<i64>());
    assert_eq!(account.total_xp, events_total);
}

// ---------------------------------------------------------------------------
// Test: level recomputation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_crossing_a_threshold_levels_up(pool: PgPool) {
    let first = XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 95, "Import backlog")
        .await
        .unwrap();
    assert_eq!(first.level, 1);
    assert!(!first.leveled_up);

    // 95 + 10 crosses the level-2 threshold at 100.
    let second = XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 10, "One more")
        .await
        .unwrap();
    assert_eq!(second.total_xp, 105);
    assert_eq!(second.level, 2);
    assert_eq!(second.level_name, "Penny Tracker");
    assert!(second.leveled_up);

    // A further small award stays within level 2.
    let third = XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "And another")
        .await
        .unwrap();
    assert_eq!(third.level, 2);
    assert!(!third.leveled_up);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_award_can_skip_levels(pool: PgPool) {
    let outcome = XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 600, "Data import")
        .await
        .unwrap();
    // 600 XP lands past the level-4 threshold at 500.
    assert_eq!(outcome.level, 4);
    assert!(outcome.leveled_up);
}

// ---------------------------------------------------------------------------
// Test: event log ordering and audit helpers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_events_newest_first(pool: PgPool) {
    XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "first")
        .await
        .unwrap();
    XpRepo::award(&pool, USER, ACTION_BADGE_UNLOCKED, 25, "second")
        .await
        .unwrap();
    XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "third")
        .await
        .unwrap();

    let events = XpRepo::recent_events(&pool, USER, 2).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].description, "third");
    assert_eq!(events[1].description, "second");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_count_events_for_action(pool: PgPool) {
    XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "a")
        .await
        .unwrap();
    XpRepo::award(&pool, USER, ACTION_TRANSACTION_LOGGED, 5, "b")
        .await
        .unwrap();
    XpRepo::award(&pool, USER, ACTION_BADGE_UNLOCKED, 25, "c")
        .await
        .unwrap();

    let logged = XpRepo::count_events_for_action(&pool, USER, ACTION_TRANSACTION_LOGGED)
        .await
        .unwrap();
    assert_eq!(logged, 2);

    let unlocked = XpRepo::count_events_for_action(&pool, USER, ACTION_BADGE_UNLOCKED)
        .await
        .unwrap();
    assert_eq!(unlocked, 1);
}

// ---------------------------------------------------------------------------
// Test: accounts are isolated per user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_awards_do_not_leak_across_users(pool: PgPool) {
    XpRepo::award(&pool, 1, ACTION_TRANSACTION_LOGGED, 5, "user one")
        .await
        .unwrap();
    XpRepo::award(&pool, 2, ACTION_TRANSACTION_LOGGED, 10, "user two")
        .await
        .unwrap();

    assert_eq!(XpRepo::get_account(&pool, 1).await.unwrap().unwrap().total_xp, 5);
    assert_eq!(XpRepo::get_account(&pool, 2).await.unwrap().unwrap().total_xp, 10);
}
