//! Pre-emptive backend: one OS thread per agent plus the moderator on the
//! calling thread.
//!
//! Every barrier expects `n + 1` parties. The moderator thread drives the
//! round loop and performs resolution between the paired barriers of each
//! phase, while agent threads run the symmetric wait/act loop. Shutdown is
//! cooperative: the moderator sets `stop`, then arrives-and-drops every
//! barrier so any agent still parked is released and exits at its next
//! check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::Phase;
use crate::moderator::Moderator;
use crate::roles::AgentVec;
use crate::state::SharedState;
use crate::sync::PhaseBarrier;

use super::{agent_day_actions, agent_night_actions, build_match, check_end};

struct Barriers {
    day_start: PhaseBarrier,
    day_end: PhaseBarrier,
    night_start: PhaseBarrier,
    night_end: PhaseBarrier,
}

impl Barriers {
    fn sized(parties: usize) -> Self {
        Self {
            day_start: PhaseBarrier::new(parties),
            day_end: PhaseBarrier::new(parties),
            night_start: PhaseBarrier::new(parties),
            night_end: PhaseBarrier::new(parties),
        }
    }

    fn drop_all(&self) {
        self.day_start.arrive_and_drop();
        self.day_end.arrive_and_drop();
        self.night_start.arrive_and_drop();
        self.night_end.arrive_and_drop();
    }
}

pub(super) fn run(cfg: GameConfig) -> Result<()> {
    let setup = build_match(&cfg)?;
    let n = setup.n;

    let barriers = Arc::new(Barriers::sized(n + 1));
    let stop = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::with_capacity(n);
    for i in 0..n {
        let agents = setup.agents.clone();
        let moderator = setup.moderator.clone();
        let state = setup.state.clone();
        let barriers = barriers.clone();
        let stop = stop.clone();
        let handle = thread::Builder::new()
            .name(format!("agent-{i}"))
            .spawn(move || {
                let run = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    agent_thread_loop(i, &agents, &moderator, &state, &barriers, &stop);
                }));
                if let Err(payload) = run {
                    // Release everyone parked on this thread's party before
                    // re-raising, so the failure surfaces at join instead of
                    // leaving the moderator blocked forever.
                    stop.store(true, Ordering::Release);
                    barriers.drop_all();
                    std::panic::resume_unwind(payload);
                }
            })
            .expect("spawning an agent thread");
        handles.push(handle);
    }

    // Moderator loop. The stop checks after each barrier pair fire only
    // when an agent thread died mid-phase; the normal path sets stop after
    // this loop.
    while !stop.load(Ordering::Acquire) && !setup.state.read().unwrap().is_game_over() {
        setup.state.write().unwrap().set_phase(Phase::Day);
        setup.moderator.begin_day();
        barriers.day_start.arrive();
        barriers.day_end.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }
        let _ = setup.moderator.resolve_day_lynch();
        if check_end(&setup.moderator, &setup.state) {
            break;
        }

        setup.state.write().unwrap().set_phase(Phase::Night);
        barriers.night_start.arrive();
        barriers.night_end.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }
        setup.moderator.resolve_night();
        if check_end(&setup.moderator, &setup.state) {
            break;
        }

        setup.state.write().unwrap().next_round();
    }

    stop.store(true, Ordering::Release);
    barriers.drop_all();
    for h in handles {
        if let Err(payload) = h.join() {
            std::panic::resume_unwind(payload);
        }
    }
    Ok(())
}

fn agent_thread_loop(
    id: usize,
    agents: &AgentVec,
    moderator: &Moderator,
    state: &SharedState,
    barriers: &Barriers,
    stop: &AtomicBool,
) {
    // Stop is only checked after a barrier arrival: every agent always
    // reaches the next rendezvous, so a barrier can never be left short
    // of parties during shutdown.
    loop {
        barriers.day_start.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }
        agent_day_actions(id, agents, moderator, state);

        barriers.day_end.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }

        barriers.night_start.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }
        agent_night_actions(id, agents, moderator, state);

        barriers.night_end.arrive();
        if stop.load(Ordering::Acquire) {
            break;
        }
    }
}
