//! Persistence layer for the gamification engine.
//!
//! `models` holds the row structs and DTOs for the five gamification
//! tables; `repositories` holds the query layer. Idempotency contracts
//! live here: unique-constraint inserts for badge unlocks, conditional
//! status flips for challenge completion, and row-locked read-modify-write
//! for XP totals and streak state.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}
