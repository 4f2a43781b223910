//! Journalist: compares two players' team membership each night.
//!
//! Needs at least two alive targets other than itself; the answer
//! (SAME/DIFFERENT) lands in the round journal only.

use crate::moderator::Moderator;

use super::Ctx;

pub(super) fn night(cx: &mut Ctx, m: &Moderator) {
    let cands = cx.alive_except_self();
    if cands.len() < 2 {
        return;
    }

    let a = cx.rng.pick(&cands).expect("candidate list checked non-empty");
    let mut b = a;
    while b == a {
        b = cx.rng.pick(&cands).expect("candidate list checked non-empty");
    }

    m.set_journalist_compare(cx.id, a, b);
}
