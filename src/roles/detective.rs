//! Detective: investigates by night, shoots once convinced.
//!
//! Confirmed mafiosi accumulate in role-private memory. With at least one
//! confirmed target the detective flips a coin each night between shooting
//! one of them and spending the night on another investigation; a fresh
//! investigation avoids already-confirmed targets when an alternative
//! exists.

use ahash::AHashSet;

use crate::core::types::PlayerId;
use crate::moderator::Moderator;

use super::Ctx;

#[derive(Default)]
pub(super) struct Memory {
    known_mafia: AHashSet<PlayerId>,
}

impl Memory {
    /// Forget dead suspects.
    fn prune(&mut self, cx: &Ctx) {
        let st = cx.state.read().unwrap();
        self.known_mafia.retain(|&id| st.is_alive(id));
    }

    /// Confirmed suspects in id order, so picks stay deterministic for a
    /// fixed seed.
    fn suspects(&self) -> Vec<PlayerId> {
        let mut v: Vec<PlayerId> = self.known_mafia.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

pub(super) fn vote_day(cx: &mut Ctx, mem: &mut Memory) -> PlayerId {
    mem.prune(cx);
    let suspects = mem.suspects();
    match cx.rng.pick(&suspects) {
        Some(t) => t,
        None => cx.random_alive_except_self(),
    }
}

pub(super) fn night(cx: &mut Ctx, mem: &mut Memory, m: &Moderator) {
    mem.prune(cx);

    let suspects = mem.suspects();
    if !suspects.is_empty() && cx.rng.coin() {
        if let Some(t) = cx.rng.pick(&suspects) {
            m.set_detective_shot(cx.id, t);
        }
        return;
    }

    // Investigate, preferring someone not yet confirmed.
    let mut target = cx.random_alive_except_self();
    if mem.known_mafia.contains(&target) {
        let fresh: Vec<PlayerId> = cx
            .alive_except_self()
            .into_iter()
            .filter(|t| !mem.known_mafia.contains(t))
            .collect();
        if let Some(t) = cx.rng.pick(&fresh) {
            target = t;
        }
    }

    if m.investigate(cx.id, target) {
        mem.known_mafia.insert(target);
    }
}
