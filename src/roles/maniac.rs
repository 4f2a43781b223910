//! Maniac: a lone killer with no allies and no tally.

use crate::moderator::Moderator;

use super::Ctx;

pub(super) fn night(cx: &mut Ctx, m: &Moderator) {
    let cands = cx.alive_except_self();
    if let Some(target) = cx.rng.pick(&cands) {
        m.set_maniac_target(cx.id, target);
    }
}
