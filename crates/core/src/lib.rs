//! Domain logic for the FinTrack gamification engine.
//!
//! Pure types and rules: the level table, the streak day-state machine,
//! the badge catalog with its declarative unlock conditions, the monthly
//! challenge pool, and the metrics bundle they are evaluated against.
//! Persistence lives in `fintrack-db`, orchestration in `fintrack-engine`.

pub mod badges;
pub mod challenges;
pub mod error;
pub mod levels;
pub mod metrics;
pub mod streak;
pub mod types;
pub mod xp;
