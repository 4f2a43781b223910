//! Executioner: acts only when the day vote ties.
//!
//! No night action; the moderator calls `decide` with the tied leaders.
//! The bot abstains half the time, otherwise picks a leader uniformly.

use crate::core::types::PlayerId;

use super::Ctx;

pub(super) fn decide(cx: &mut Ctx, leaders: &[PlayerId]) -> Option<PlayerId> {
    if cx.rng.coin() {
        return None;
    }
    cx.rng.pick(leaders)
}
