use fintrack_core::badges::DEFAULT_BADGE_UNLOCK_XP;

/// Engine tuning loaded from environment variables.
///
/// All fields have defaults suitable for local development; in
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Challenge templates assigned per user per calendar month
    /// (default: `3`).
    pub challenges_per_month: usize,
    /// XP bonus granted on every badge unlock (default: `25`).
    pub badge_unlock_xp: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            challenges_per_month: 3,
            badge_unlock_xp: DEFAULT_BADGE_UNLOCK_XP,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `CHALLENGES_PER_MONTH` | `3`     |
    /// | `BADGE_UNLOCK_XP`      | `25`    |
    pub fn from_env() -> Self {
        let challenges_per_month: usize = std::env::var("CHALLENGES_PER_MONTH")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("CHALLENGES_PER_MONTH must be a valid usize");

        let badge_unlock_xp: i32 = std::env::var("BADGE_UNLOCK_XP")
            .unwrap_or_else(|_| DEFAULT_BADGE_UNLOCK_XP.to_string())
            .parse()
            .expect("BADGE_UNLOCK_XP must be a valid i32");

        Self {
            challenges_per_month,
            badge_unlock_xp,
        }
    }
}
