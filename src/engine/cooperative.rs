//! Cooperative backend: every agent is a state machine resumed by a
//! single-threaded driver.
//!
//! Barriers expect exactly `n` parties; the moderator's work happens in
//! the completion slot of each barrier (day start opens the round, day
//! end resolves the lynch, night end resolves the night and advances the
//! round), strictly before any waiter is resumed. Resumption follows
//! waiter insertion order, which makes the whole match deterministic for
//! a fixed seed.

use std::collections::VecDeque;

use crate::coop::{Arrival, PhaseBarrier, PhasePoint, TaskId};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::Phase;
use crate::state::SharedState;

use super::{agent_day_actions, agent_night_actions, build_match, check_end, MatchSetup};

/// Where a task stands in its round loop.
#[derive(Debug, Clone, Copy)]
enum Pos {
    /// Not yet started; first stop is the day-start rendezvous.
    Start,
    /// Resumed after the given barrier released it.
    Resumed(PhasePoint),
}

struct Driver {
    setup: MatchSetup,
    day_start: PhaseBarrier,
    day_end: PhaseBarrier,
    night_start: PhaseBarrier,
    night_end: PhaseBarrier,
    stop: bool,
}

pub(super) fn run(cfg: GameConfig) -> Result<()> {
    let setup = build_match(&cfg)?;
    let n = setup.n;

    let mut driver = Driver {
        setup,
        day_start: PhaseBarrier::new(n),
        day_end: PhaseBarrier::new(n),
        night_start: PhaseBarrier::new(n),
        night_end: PhaseBarrier::new(n),
        stop: false,
    };

    let mut pos: Vec<Pos> = vec![Pos::Start; n];
    let mut runnable: VecDeque<TaskId> = (0..n).collect();

    while let Some(task) = runnable.pop_front() {
        let Some(point) = driver.step(task, pos[task]) else {
            continue; // task finished
        };
        pos[task] = Pos::Resumed(point);

        if let Arrival::Complete(waiters) = driver.barrier_mut(point).arrive(task) {
            driver.on_barrier_complete(point);
            runnable.extend(waiters);
        }
    }

    Ok(())
}

impl Driver {
    fn barrier_mut(&mut self, point: PhasePoint) -> &mut PhaseBarrier {
        match point {
            PhasePoint::DayStart => &mut self.day_start,
            PhasePoint::DayEnd => &mut self.day_end,
            PhasePoint::NightStart => &mut self.night_start,
            PhasePoint::NightEnd => &mut self.night_end,
        }
    }

    /// Run one task segment: the work between the barrier that released
    /// the task and the next barrier it arrives at. Returns the next
    /// rendezvous, or `None` when the task is done.
    fn step(&self, task: TaskId, pos: Pos) -> Option<PhasePoint> {
        let MatchSetup { state, agents, moderator, .. } = &self.setup;
        match pos {
            Pos::Start => Some(PhasePoint::DayStart),
            Pos::Resumed(point) => {
                if self.stop {
                    return None;
                }
                match point {
                    PhasePoint::DayStart => {
                        agent_day_actions(task, agents, moderator, state);
                        Some(PhasePoint::DayEnd)
                    }
                    PhasePoint::DayEnd => Some(PhasePoint::NightStart),
                    PhasePoint::NightStart => {
                        agent_night_actions(task, agents, moderator, state);
                        Some(PhasePoint::NightEnd)
                    }
                    PhasePoint::NightEnd => Some(PhasePoint::DayStart),
                }
            }
        }
    }

    /// The completion slot of each barrier: moderator work that must run
    /// while every task is parked.
    fn on_barrier_complete(&mut self, point: PhasePoint) {
        let moderator = &self.setup.moderator;
        let state: &SharedState = &self.setup.state;
        match point {
            PhasePoint::DayStart => {
                state.write().unwrap().set_phase(Phase::Day);
                moderator.begin_day();
            }
            PhasePoint::DayEnd => {
                let _ = moderator.resolve_day_lynch();
                if check_end(moderator, state) {
                    self.stop = true;
                } else {
                    state.write().unwrap().set_phase(Phase::Night);
                }
            }
            PhasePoint::NightStart => {}
            PhasePoint::NightEnd => {
                moderator.resolve_night();
                if check_end(moderator, state) {
                    self.stop = true;
                } else {
                    state.write().unwrap().next_round();
                }
            }
        }
    }
}
