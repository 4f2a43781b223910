//! Citizen: votes at random, sleeps through the night.

use crate::core::types::PlayerId;

use super::Ctx;

pub(super) fn vote_day(cx: &mut Ctx) -> PlayerId {
    cx.random_alive_except_self()
}
