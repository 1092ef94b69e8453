//! Monthly challenge rotation (PRD-21).
//!
//! Which templates a user gets each month is configuration, not user
//! choice: a deterministic rotation seeded by the user id and month key,
//! so repeated assignment calls within a month always pick the same
//! subset without storing extra state.

use fintrack_core::challenges::{ChallengeTemplate, CHALLENGES};
use fintrack_core::types::DbId;

/// Select a user's challenge templates for a month.
///
/// Takes `count` consecutive templates from the pool starting at an
/// offset mixed from the user id and month key. `count` is capped at
/// the pool size.
pub fn rotation_for(user_id: DbId, month: &str, count: usize) -> Vec<&'static ChallengeTemplate> {
    let pool_len = CHALLENGES.len();
    let count = count.min(pool_len);

    let mut seed = user_id as u64;
    for byte in month.bytes() {
        seed = seed.wrapping_mul(31).wrapping_add(u64::from(byte));
    }
    let offset = (seed % pool_len as u64) as usize;

    (0..count)
        .map(|i| &CHALLENGES[(offset + i) % pool_len])
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
