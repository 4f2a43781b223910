//! Mafia: hunts Town by day vote and by night ballot.
//!
//! Both hooks prefer an alive Town target; when none is reachable they
//! fall back to any alive non-self target. The night ballot is one vote
//! into the moderator's tally; the moderator picks the actual victim.

use crate::core::types::PlayerId;
use crate::moderator::Moderator;

use super::Ctx;

pub(super) fn vote_day(cx: &mut Ctx) -> PlayerId {
    cx.random_alive_town_except_self()
}

pub(super) fn night(cx: &mut Ctx, m: &Moderator) {
    let target = cx.random_alive_town_except_self();
    m.mafia_vote_target(cx.id, target);
}
