//! Badge catalog and unlock-condition evaluation (PRD-20).
//!
//! The catalog is static, declarative data: each badge names a condition
//! over the metrics bundle rather than carrying code. Composite badges
//! (all badges of a category) are declared after their prerequisites so a
//! single evaluation pass can cascade-unlock them.

use std::collections::HashSet;

use serde::Serialize;

use crate::metrics::{CounterMetric, FlagMetric, MetricsBundle, MonthlyCheck, PercentMetric};

/// Default XP bonus granted for every badge unlock.
pub const DEFAULT_BADGE_UNLOCK_XP: i32 = 25;

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// Badge grouping used for display and for composite conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Onboarding,
    Milestone,
    Behavioral,
    Skill,
}

impl BadgeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeCategory::Onboarding => "onboarding",
            BadgeCategory::Milestone => "milestone",
            BadgeCategory::Behavioral => "behavioral",
            BadgeCategory::Skill => "skill",
        }
    }
}

/// A declarative unlock condition over the metrics bundle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockCondition {
    /// A counter metric reached a threshold.
    Counter {
        metric: CounterMetric,
        at_least: i64,
    },
    /// A percentage metric reached a threshold.
    Percent { metric: PercentMetric, at_least: f64 },
    /// A boolean metric is set.
    Flag(FlagMetric),
    /// A per-month check held for an unbroken run of recent months.
    ConsecutiveMonths { check: MonthlyCheck, months: usize },
    /// Every non-composite badge of a category is already unlocked.
    AllOfCategory(BadgeCategory),
}

/// A single entry in the static badge catalog.
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub condition: UnlockCondition,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The full badge catalog. Composite badges must appear after every badge
/// of the category they reference (enforced by a test below).
pub const BADGES: &[BadgeDefinition] = &[
    // -- onboarding --
    BadgeDefinition {
        id: "first_expense",
        name: "First Expense",
        description: "Log your first transaction",
        category: BadgeCategory::Onboarding,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::TransactionCount,
            at_least: 1,
        },
    },
    BadgeDefinition {
        id: "first_budget",
        name: "First Budget",
        description: "Create your first budget",
        category: BadgeCategory::Onboarding,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::BudgetCount,
            at_least: 1,
        },
    },
    BadgeDefinition {
        id: "first_goal",
        name: "Goal Setter",
        description: "Create your first savings goal",
        category: BadgeCategory::Onboarding,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::GoalCount,
            at_least: 1,
        },
    },
    BadgeDefinition {
        id: "first_investment",
        name: "Market Entrant",
        description: "Add your first investment holding",
        category: BadgeCategory::Onboarding,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::InvestmentCount,
            at_least: 1,
        },
    },
    BadgeDefinition {
        id: "week_on_board",
        name: "One Week In",
        description: "Keep your account for a full week",
        category: BadgeCategory::Onboarding,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::AccountAgeDays,
            at_least: 7,
        },
    },
    // -- milestone --
    BadgeDefinition {
        id: "getting_started",
        name: "Getting Started",
        description: "Unlock every onboarding badge",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::AllOfCategory(BadgeCategory::Onboarding),
    },
    BadgeDefinition {
        id: "century",
        name: "Century Club",
        description: "Log 100 transactions",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::TransactionCount,
            at_least: 100,
        },
    },
    BadgeDefinition {
        id: "ledger_legend",
        name: "Ledger Legend",
        description: "Log 500 transactions",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::TransactionCount,
            at_least: 500,
        },
    },
    BadgeDefinition {
        id: "streak_week",
        name: "Seven-Day Streak",
        description: "Log activity seven days in a row",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::LongestStreak,
            at_least: 7,
        },
    },
    BadgeDefinition {
        id: "streak_month",
        name: "Thirty-Day Streak",
        description: "Log activity thirty days in a row",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::LongestStreak,
            at_least: 30,
        },
    },
    BadgeDefinition {
        id: "streak_century",
        name: "Hundred-Day Streak",
        description: "Log activity one hundred days in a row",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::LongestStreak,
            at_least: 100,
        },
    },
    BadgeDefinition {
        id: "goal_getter",
        name: "Goal Getter",
        description: "Complete five savings goals",
        category: BadgeCategory::Milestone,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::GoalsCompleted,
            at_least: 5,
        },
    },
    // -- behavioral --
    BadgeDefinition {
        id: "budget_master",
        name: "Budget Master",
        description: "Keep every budget category under its limit this month",
        category: BadgeCategory::Behavioral,
        condition: UnlockCondition::Flag(FlagMetric::AllBudgetsUnderLimit),
    },
    BadgeDefinition {
        id: "super_saver",
        name: "Super Saver",
        description: "Reach a savings rate of 30% this month",
        category: BadgeCategory::Behavioral,
        condition: UnlockCondition::Percent {
            metric: PercentMetric::SavingsRate,
            at_least: 30.0,
        },
    },
    BadgeDefinition {
        id: "disciplined_quarter",
        name: "Disciplined Quarter",
        description: "Stay under budget three months in a row",
        category: BadgeCategory::Behavioral,
        condition: UnlockCondition::ConsecutiveMonths {
            check: MonthlyCheck::UnderBudget,
            months: 3,
        },
    },
    BadgeDefinition {
        id: "disciplined_half",
        name: "Disciplined Half-Year",
        description: "Stay under budget six months in a row",
        category: BadgeCategory::Behavioral,
        condition: UnlockCondition::ConsecutiveMonths {
            check: MonthlyCheck::UnderBudget,
            months: 6,
        },
    },
    BadgeDefinition {
        id: "steady_saver",
        name: "Steady Saver",
        description: "Hold a 20% savings rate three months in a row",
        category: BadgeCategory::Behavioral,
        condition: UnlockCondition::ConsecutiveMonths {
            check: MonthlyCheck::SavingsRateAtLeast(20.0),
            months: 3,
        },
    },
    // -- skill --
    BadgeDefinition {
        id: "diversified",
        name: "Diversified",
        description: "Hold five investment positions",
        category: BadgeCategory::Skill,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::InvestmentCount,
            at_least: 5,
        },
    },
    BadgeDefinition {
        id: "portfolio_pro",
        name: "Portfolio Pro",
        description: "Review your portfolio ten times",
        category: BadgeCategory::Skill,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::PortfolioReviews,
            at_least: 10,
        },
    },
    BadgeDefinition {
        id: "category_expert",
        name: "Category Expert",
        description: "Use ten different spending categories",
        category: BadgeCategory::Skill,
        condition: UnlockCondition::Counter {
            metric: CounterMetric::CategoriesUsed,
            at_least: 10,
        },
    },
    BadgeDefinition {
        id: "health_conscious",
        name: "Health Conscious",
        description: "Reach a financial-health score of 80",
        category: BadgeCategory::Skill,
        condition: UnlockCondition::Percent {
            metric: PercentMetric::HealthScore,
            at_least: 80.0,
        },
    },
    BadgeDefinition {
        id: "compliance_ace",
        name: "Compliance Ace",
        description: "Reach 90% budget compliance this month",
        category: BadgeCategory::Skill,
        condition: UnlockCondition::Percent {
            metric: PercentMetric::BudgetCompliance,
            at_least: 90.0,
        },
    },
];

/// Look up a badge definition by id.
pub fn badge_by_id(id: &str) -> Option<&'static BadgeDefinition> {
    BADGES.iter().find(|b| b.id == id)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a badge's condition against the metrics bundle and the set of
/// already-unlocked badge ids.
///
/// The `unlocked` set only matters for composite conditions; callers that
/// unlock badges while iterating the catalog should add each newly
/// unlocked id to the set so composites later in the pass see it.
pub fn evaluate(
    badge: &BadgeDefinition,
    metrics: &MetricsBundle,
    unlocked: &HashSet<String>,
) -> bool {
    match badge.condition {
        UnlockCondition::Counter { metric, at_least } => metrics.counter(metric) >= at_least,
        UnlockCondition::Percent { metric, at_least } => metrics.percent(metric) >= at_least,
        UnlockCondition::Flag(metric) => metrics.flag(metric),
        UnlockCondition::ConsecutiveMonths { check, months } => {
            metrics.consecutive_months(check) >= months
        }
        UnlockCondition::AllOfCategory(category) => BADGES
            .iter()
            .filter(|b| b.category == category && b.id != badge.id)
            .all(|b| unlocked.contains(b.id)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
