//! Monthly challenge pool and progress math (PRD-21).
//!
//! Challenge templates are static configuration; a per-user subset is
//! assigned each calendar month by the engine. Progress is recomputed
//! from live metrics, so `current_value` can move in both directions
//! while completion stays one-shot at the persistence layer.

use chrono::{Datelike, NaiveDate};

use crate::error::CoreError;
use crate::metrics::MetricsBundle;

// ---------------------------------------------------------------------------
// Assignment status
// ---------------------------------------------------------------------------

/// Assignment still in progress this month.
pub const CHALLENGE_ACTIVE: &str = "active";
/// Assignment whose target was reached; the reward has been granted.
pub const CHALLENGE_COMPLETED: &str = "completed";

// ---------------------------------------------------------------------------
// Template catalog
// ---------------------------------------------------------------------------

/// The metric a challenge measures, each with its own monthly
/// aggregation rule supplied via the metrics bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeMetric {
    /// Distinct days with at least one logged transaction this month.
    DaysLogged,
    /// Savings rate percentage this month.
    SavingsRate,
    /// Percentage of budget categories under their limit this month.
    BudgetCompliance,
    /// Current consecutive-day streak length.
    StreakDays,
    /// Transactions assigned a category this month.
    CategorizedTransactions,
    /// Portfolio review sessions this month.
    PortfolioReviews,
    /// Dining spend reduction versus last month, in percent.
    DiningReduction,
}

/// A single entry in the static challenge pool.
pub struct ChallengeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: f64,
    pub metric: ChallengeMetric,
    pub xp_reward: i32,
}

/// The full challenge pool the monthly rotation draws from.
pub const CHALLENGES: &[ChallengeTemplate] = &[
    ChallengeTemplate {
        id: "daily_logger",
        name: "Daily Logger",
        description: "Log expenses on 20 different days this month",
        target: 20.0,
        metric: ChallengeMetric::DaysLogged,
        xp_reward: 100,
    },
    ChallengeTemplate {
        id: "savings_sprint",
        name: "Savings Sprint",
        description: "Reach a 20% savings rate this month",
        target: 20.0,
        metric: ChallengeMetric::SavingsRate,
        xp_reward: 150,
    },
    ChallengeTemplate {
        id: "budget_guardian",
        name: "Budget Guardian",
        description: "Keep 90% of budget categories under their limit",
        target: 90.0,
        metric: ChallengeMetric::BudgetCompliance,
        xp_reward: 150,
    },
    ChallengeTemplate {
        id: "streak_keeper",
        name: "Streak Keeper",
        description: "Hold a 14-day activity streak",
        target: 14.0,
        metric: ChallengeMetric::StreakDays,
        xp_reward: 100,
    },
    ChallengeTemplate {
        id: "category_curator",
        name: "Category Curator",
        description: "Categorize 30 transactions this month",
        target: 30.0,
        metric: ChallengeMetric::CategorizedTransactions,
        xp_reward: 75,
    },
    ChallengeTemplate {
        id: "portfolio_checkup",
        name: "Portfolio Checkup",
        description: "Review your portfolio four times this month",
        target: 4.0,
        metric: ChallengeMetric::PortfolioReviews,
        xp_reward: 75,
    },
    ChallengeTemplate {
        id: "dining_diet",
        name: "Dining Diet",
        description: "Cut dining spend by 25% versus last month",
        target: 25.0,
        metric: ChallengeMetric::DiningReduction,
        xp_reward: 125,
    },
];

/// Look up a challenge template by id.
pub fn template_by_id(id: &str) -> Option<&'static ChallengeTemplate> {
    CHALLENGES.iter().find(|c| c.id == id)
}

// ---------------------------------------------------------------------------
// Progress math
// ---------------------------------------------------------------------------

/// Read a challenge metric's current value from the bundle.
pub fn current_value(metric: ChallengeMetric, metrics: &MetricsBundle) -> f64 {
    match metric {
        ChallengeMetric::DaysLogged => metrics.days_logged_this_month as f64,
        ChallengeMetric::SavingsRate => metrics.savings_rate_pct,
        ChallengeMetric::BudgetCompliance => metrics.budget_compliance_pct,
        ChallengeMetric::StreakDays => metrics.current_streak as f64,
        ChallengeMetric::CategorizedTransactions => metrics.categorized_transaction_count as f64,
        ChallengeMetric::PortfolioReviews => metrics.portfolio_reviews as f64,
        ChallengeMetric::DiningReduction => metrics.dining_reduction_pct(),
    }
}

/// Completion percentage for a current value against a target, capped at
/// 100 and floored at 0.
pub fn progress_pct(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Month keys
// ---------------------------------------------------------------------------

/// Month key (`YYYY-MM`) for a calendar date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Validate a `YYYY-MM` month key.
pub fn validate_month_key(key: &str) -> Result<(), CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "Invalid month key '{key}'. Expected YYYY-MM with month 01-12"
        ))
    };

    let (year, month) = key.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    year.parse::<i32>().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- catalog integrity ----------------------------------------------------

    #[test]
    fn challenge_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for template in CHALLENGES {
            assert!(
                seen.insert(template.id),
                "Duplicate challenge id '{}'",
                template.id
            );
        }
    }

    #[test]
    fn targets_and_rewards_are_positive() {
        for template in CHALLENGES {
            assert!(template.target > 0.0, "Challenge '{}' target", template.id);
            assert!(template.xp_reward > 0, "Challenge '{}' reward", template.id);
        }
    }

    #[test]
    fn template_lookup_by_id() {
        assert_eq!(template_by_id("daily_logger").unwrap().xp_reward, 100);
        assert!(template_by_id("no_such_challenge").is_none());
    }

    // -- current_value --------------------------------------------------------

    #[test]
    fn metric_values_read_from_bundle() {
        let metrics = MetricsBundle {
            days_logged_this_month: 12,
            savings_rate_pct: 18.5,
            budget_compliance_pct: 92.0,
            current_streak: 6,
            categorized_transaction_count: 40,
            portfolio_reviews: 2,
            dining_spend_this_month: 60.0,
            dining_spend_last_month: 100.0,
            ..Default::default()
        };
        assert_eq!(current_value(ChallengeMetric::DaysLogged, &metrics), 12.0);
        assert_eq!(current_value(ChallengeMetric::SavingsRate, &metrics), 18.5);
        assert_eq!(
            current_value(ChallengeMetric::BudgetCompliance, &metrics),
            92.0
        );
        assert_eq!(current_value(ChallengeMetric::StreakDays, &metrics), 6.0);
        assert_eq!(
            current_value(ChallengeMetric::CategorizedTransactions, &metrics),
            40.0
        );
        assert_eq!(
            current_value(ChallengeMetric::PortfolioReviews, &metrics),
            2.0
        );
        assert_eq!(
            current_value(ChallengeMetric::DiningReduction, &metrics),
            40.0
        );
    }

    // -- progress_pct ---------------------------------------------------------

    #[test]
    fn progress_caps_at_one_hundred() {
        assert_eq!(progress_pct(25.0, 20.0), 100.0);
    }

    #[test]
    fn progress_is_proportional_below_target() {
        assert_eq!(progress_pct(5.0, 20.0), 25.0);
        assert_eq!(progress_pct(0.0, 20.0), 0.0);
    }

    // -- month keys -----------------------------------------------------------

    #[test]
    fn month_key_formats_with_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(month_key(date), "2025-03");
    }

    #[test]
    fn valid_month_keys_accepted() {
        assert!(validate_month_key("2025-01").is_ok());
        assert!(validate_month_key("1999-12").is_ok());
    }

    #[test]
    fn malformed_month_keys_rejected() {
        assert!(validate_month_key("2025-13").is_err());
        assert!(validate_month_key("2025-00").is_err());
        assert!(validate_month_key("2025-1").is_err());
        assert!(validate_month_key("25-01").is_err());
        assert!(validate_month_key("2025/01").is_err());
        assert!(validate_month_key("").is_err());
    }
}
