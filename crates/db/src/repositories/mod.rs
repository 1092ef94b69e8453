//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must compose
//! into a caller's transaction take a `&mut Transaction` instead and are
//! suffixed `_tx`.

pub mod badge_repo;
pub mod challenge_repo;
pub mod streak_repo;
pub mod xp_repo;

pub use badge_repo::BadgeRepo;
pub use challenge_repo::ChallengeRepo;
pub use streak_repo::StreakRepo;
pub use xp_repo::XpRepo;
