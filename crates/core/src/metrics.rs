//! Metrics bundle consumed by badge and challenge evaluation (PRD-20).
//!
//! All values are plain numbers, strings, and dates supplied per user by
//! the data-access layer. The bundle is `Default`-able on purpose: a user
//! with no upstream state evaluates against zero/baseline values instead
//! of failing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metric references
// ---------------------------------------------------------------------------

/// A count-like metric readable from the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    TransactionCount,
    CategorizedTransactionCount,
    CategoriesUsed,
    BudgetCount,
    GoalCount,
    GoalsCompleted,
    InvestmentCount,
    PortfolioReviews,
    AccountAgeDays,
    CurrentStreak,
    LongestStreak,
    DaysLoggedThisMonth,
}

/// A percentage-valued metric readable from the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentMetric {
    SavingsRate,
    BudgetCompliance,
    HealthScore,
    DiningReduction,
}

/// A boolean metric readable from the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagMetric {
    AllBudgetsUnderLimit,
}

/// A per-month predicate used for consecutive-month conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthlyCheck {
    /// Total spend stayed under every budget limit that month.
    UnderBudget,
    /// Savings rate reached at least this percentage that month.
    SavingsRateAtLeast(f64),
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// One month of aggregated history, used by consecutive-month conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub under_budget: bool,
    pub savings_rate_pct: f64,
}

/// Per-user aggregate metrics supplied by the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub transaction_count: i64,
    pub categorized_transaction_count: i64,
    pub categories_used: i64,
    pub budget_count: i64,
    pub goal_count: i64,
    pub goals_completed: i64,
    pub investment_count: i64,
    pub portfolio_reviews: i64,
    pub account_age_days: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub days_logged_this_month: i64,
    pub savings_rate_pct: f64,
    pub budget_compliance_pct: f64,
    /// Latest financial-health score in `[0, 100]`, if one was computed.
    pub health_score: Option<f64>,
    pub all_budgets_under_limit: bool,
    pub dining_spend_this_month: f64,
    pub dining_spend_last_month: f64,
    /// Monthly history ordered newest first, current month excluded or
    /// included at the provider's discretion; consecutive-month checks
    /// walk it from the front.
    pub monthly_history: Vec<MonthlySummary>,
}

impl MetricsBundle {
    /// Read a count-like metric.
    pub fn counter(&self, metric: CounterMetric) -> i64 {
        match metric {
            CounterMetric::TransactionCount => self.transaction_count,
            CounterMetric::CategorizedTransactionCount => self.categorized_transaction_count,
            CounterMetric::CategoriesUsed => self.categories_used,
            CounterMetric::BudgetCount => self.budget_count,
            CounterMetric::GoalCount => self.goal_count,
            CounterMetric::GoalsCompleted => self.goals_completed,
            CounterMetric::InvestmentCount => self.investment_count,
            CounterMetric::PortfolioReviews => self.portfolio_reviews,
            CounterMetric::AccountAgeDays => self.account_age_days,
            CounterMetric::CurrentStreak => self.current_streak,
            CounterMetric::LongestStreak => self.longest_streak,
            CounterMetric::DaysLoggedThisMonth => self.days_logged_this_month,
        }
    }

    /// Read a percentage metric. A missing health score reads as 0.
    pub fn percent(&self, metric: PercentMetric) -> f64 {
        match metric {
            PercentMetric::SavingsRate => self.savings_rate_pct,
            PercentMetric::BudgetCompliance => self.budget_compliance_pct,
            PercentMetric::HealthScore => self.health_score.unwrap_or(0.0),
            PercentMetric::DiningReduction => self.dining_reduction_pct(),
        }
    }

    /// Read a boolean metric.
    pub fn flag(&self, metric: FlagMetric) -> bool {
        match metric {
            FlagMetric::AllBudgetsUnderLimit => self.all_budgets_under_limit,
        }
    }

    /// Percentage reduction of dining spend versus the previous month,
    /// floored at 0 (an increase counts as no reduction). Reads as 0 when
    /// there was no dining spend last month to compare against.
    pub fn dining_reduction_pct(&self) -> f64 {
        if self.dining_spend_last_month <= 0.0 {
            return 0.0;
        }
        let reduction = (self.dining_spend_last_month - self.dining_spend_this_month)
            / self.dining_spend_last_month
            * 100.0;
        reduction.max(0.0)
    }

    /// Length of the unbroken run of months satisfying `check`, walking
    /// the history from the most recent month and stopping at the first
    /// month that fails.
    pub fn consecutive_months(&self, check: MonthlyCheck) -> usize {
        self.monthly_history
            .iter()
            .take_while(|m| match check {
                MonthlyCheck::UnderBudget => m.under_budget,
                MonthlyCheck::SavingsRateAtLeast(pct) => m.savings_rate_pct >= pct,
            })
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn month(key: &str, under_budget: bool, savings_rate_pct: f64) -> MonthlySummary {
        MonthlySummary {
            month: key.to_string(),
            income: 4_000.0,
            expenses: 3_000.0,
            under_budget,
            savings_rate_pct,
        }
    }

    #[test]
    fn default_bundle_reads_as_baseline() {
        let bundle = MetricsBundle::default();
        assert_eq!(bundle.counter(CounterMetric::TransactionCount), 0);
        assert_eq!(bundle.percent(PercentMetric::HealthScore), 0.0);
        assert!(!bundle.flag(FlagMetric::AllBudgetsUnderLimit));
        assert_eq!(bundle.consecutive_months(MonthlyCheck::UnderBudget), 0);
    }

    #[test]
    fn health_score_reads_through_when_present() {
        let bundle = MetricsBundle {
            health_score: Some(82.5),
            ..Default::default()
        };
        assert_eq!(bundle.percent(PercentMetric::HealthScore), 82.5);
    }

    // -- dining reduction -----------------------------------------------------

    #[test]
    fn dining_reduction_computed_from_both_months() {
        let bundle = MetricsBundle {
            dining_spend_this_month: 75.0,
            dining_spend_last_month: 100.0,
            ..Default::default()
        };
        assert_eq!(bundle.dining_reduction_pct(), 25.0);
    }

    #[test]
    fn dining_increase_floors_at_zero() {
        let bundle = MetricsBundle {
            dining_spend_this_month: 150.0,
            dining_spend_last_month: 100.0,
            ..Default::default()
        };
        assert_eq!(bundle.dining_reduction_pct(), 0.0);
    }

    #[test]
    fn dining_reduction_without_history_is_zero() {
        let bundle = MetricsBundle {
            dining_spend_this_month: 50.0,
            dining_spend_last_month: 0.0,
            ..Default::default()
        };
        assert_eq!(bundle.dining_reduction_pct(), 0.0);
    }

    // -- consecutive months ---------------------------------------------------

    #[test]
    fn consecutive_months_stop_at_first_failure() {
        let bundle = MetricsBundle {
            monthly_history: vec![
                month("2025-03", true, 25.0),
                month("2025-02", true, 10.0),
                month("2025-01", false, 30.0),
                month("2024-12", true, 30.0),
            ],
            ..Default::default()
        };
        assert_eq!(bundle.consecutive_months(MonthlyCheck::UnderBudget), 2);
        assert_eq!(
            bundle.consecutive_months(MonthlyCheck::SavingsRateAtLeast(20.0)),
            1
        );
    }

    #[test]
    fn fully_unbroken_run_counts_every_month() {
        let bundle = MetricsBundle {
            monthly_history: vec![
                month("2025-03", true, 25.0),
                month("2025-02", true, 25.0),
                month("2025-01", true, 25.0),
            ],
            ..Default::default()
        };
        assert_eq!(bundle.consecutive_months(MonthlyCheck::UnderBudget), 3);
    }
}
