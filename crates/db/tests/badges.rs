//! Integration tests for the badge unlock repository.
//!
//! The `(user_id, badge_id)` unique constraint is the engine's core
//! idempotency contract; these tests exercise it directly.

use fintrack_db::repositories::BadgeRepo;
use sqlx::PgPool;

const USER: i64 = 303;

async fn unlock(pool: &PgPool, user_id: i64, badge_id: &str) -> bool {
    let mut tx = pool.begin().await.unwrap();
    let inserted = BadgeRepo::try_unlock_tx(&mut tx, user_id, badge_id)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    inserted
}

// ---------------------------------------------------------------------------
// Test: insert-if-absent semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_unlock_inserts(pool: PgPool) {
    assert!(unlock(&pool, USER, "first_expense").await);
    assert_eq!(BadgeRepo::count_for_user(&pool, USER).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_unlock_is_a_no_op(pool: PgPool) {
    assert!(unlock(&pool, USER, "first_expense").await);
    assert!(!unlock(&pool, USER, "first_expense").await);
    assert_eq!(BadgeRepo::count_for_user(&pool, USER).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_badge_for_different_users(pool: PgPool) {
    assert!(unlock(&pool, 1, "first_expense").await);
    assert!(unlock(&pool, 2, "first_expense").await);
    assert_eq!(BadgeRepo::count_for_user(&pool, 1).await.unwrap(), 1);
    assert_eq!(BadgeRepo::count_for_user(&pool, 2).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Test: listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unlocked_ids_in_unlock_order(pool: PgPool) {
    unlock(&pool, USER, "first_expense").await;
    unlock(&pool, USER, "first_budget").await;
    unlock(&pool, USER, "century").await;

    let ids = BadgeRepo::unlocked_ids(&pool, USER).await.unwrap();
    assert_eq!(ids, vec!["first_expense", "first_budget", "century"]);

    let records = BadgeRepo::list_for_user(&pool, USER).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].badge_id, "first_expense");
    assert_eq!(records[0].user_id, USER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_listing_for_new_user(pool: PgPool) {
    assert!(BadgeRepo::unlocked_ids(&pool, USER).await.unwrap().is_empty());
    assert_eq!(BadgeRepo::count_for_user(&pool, USER).await.unwrap(), 0);
}
