//! Doctor: heals one target per night, never the same one twice running.
//!
//! Self-heal is permitted. When the only candidate left is last night's
//! patient, the doctor sits the night out.

use crate::core::types::PlayerId;
use crate::moderator::Moderator;

use super::Ctx;

#[derive(Default)]
pub(super) struct Memory {
    prev_heal: Option<PlayerId>,
}

pub(super) fn night(cx: &mut Ctx, mem: &mut Memory, m: &Moderator) {
    let mut cands = cx.alive_including_self();
    if let Some(prev) = mem.prev_heal {
        cands.retain(|&t| t != prev);
    }

    let Some(target) = cx.rng.pick(&cands) else {
        tracing::info!("Doctor: no heal candidate tonight");
        return;
    };

    m.set_doctor_heal(cx.id, target);
    mem.prev_heal = Some(target);
}
