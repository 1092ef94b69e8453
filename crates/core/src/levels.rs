//! Level table and progression lookup (PRD-18).
//!
//! The level table is static configuration: thresholds are strictly
//! increasing and level 1 starts at 0 XP, so every non-negative XP value
//! maps to exactly one level.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Level table
// ---------------------------------------------------------------------------

/// A single entry in the static level table.
pub struct LevelDefinition {
    pub level: i32,
    pub name: &'static str,
    /// Minimum total XP required to hold this level.
    pub threshold: i64,
}

/// The full level table, ordered by ascending threshold.
pub const LEVELS: &[LevelDefinition] = &[
    LevelDefinition {
        level: 1,
        name: "Budgeting Beginner",
        threshold: 0,
    },
    LevelDefinition {
        level: 2,
        name: "Penny Tracker",
        threshold: 100,
    },
    LevelDefinition {
        level: 3,
        name: "Savvy Saver",
        threshold: 250,
    },
    LevelDefinition {
        level: 4,
        name: "Budget Apprentice",
        threshold: 500,
    },
    LevelDefinition {
        level: 5,
        name: "Money Manager",
        threshold: 1_000,
    },
    LevelDefinition {
        level: 6,
        name: "Finance Strategist",
        threshold: 2_000,
    },
    LevelDefinition {
        level: 7,
        name: "Wealth Builder",
        threshold: 3_500,
    },
    LevelDefinition {
        level: 8,
        name: "Investment Adept",
        threshold: 5_000,
    },
    LevelDefinition {
        level: 9,
        name: "Portfolio Master",
        threshold: 7_500,
    },
    LevelDefinition {
        level: 10,
        name: "Financial Legend",
        threshold: 10_000,
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolved level information for an XP total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInfo {
    pub level: i32,
    pub name: &'static str,
    pub current_xp: i64,
    /// Threshold of the next level, absent at the table's top level.
    pub next_level_threshold: Option<i64>,
    /// Progress toward the next level in `[0, 100]`; 100 at the top level.
    pub progress_pct: f64,
}

/// Resolve the level for an XP total.
///
/// Scans the table for the highest level whose threshold is at or below
/// `xp`. Negative input is clamped to 0.
pub fn level_for(xp: i64) -> LevelInfo {
    let xp = xp.max(0);

    let mut idx = 0;
    for (i, def) in LEVELS.iter().enumerate() {
        if xp >= def.threshold {
            idx = i;
        } else {
            break;
        }
    }

    let def = &LEVELS[idx];
    let next = LEVELS.get(idx + 1);
    let progress_pct = match next {
        Some(n) => {
            let span = (n.threshold - def.threshold) as f64;
            (((xp - def.threshold) as f64 / span) * 100.0).clamp(0.0, 100.0)
        }
        None => 100.0,
    };

    LevelInfo {
        level: def.level,
        name: def.name,
        current_xp: xp,
        next_level_threshold: next.map(|n| n.threshold),
        progress_pct,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
