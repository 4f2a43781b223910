//! Reusable N-party rendezvous for the threaded backend.
//!
//! `arrive` blocks until every expected party has arrived. The last
//! arriver runs the optional completion callback while the barrier is
//! still closed, then releases everyone; the barrier resets and is ready
//! for the next cycle. `arrive_and_drop` lets a party leave for good:
//! it counts as an arrival now and shrinks the expected count for every
//! later cycle, which is how the engine abandons the rendezvous on
//! shutdown.

use std::sync::{Condvar, Mutex};

type Callback = Box<dyn Fn() + Send + Sync>;

struct BarrierState {
    expected: usize,
    arrived: usize,
    /// Parties that left via `arrive_and_drop` this cycle; subtracted
    /// from `expected` when the cycle completes.
    dropped: usize,
    generation: u64,
}

pub struct PhaseBarrier {
    state: Mutex<BarrierState>,
    cv: Condvar,
    on_complete: Option<Callback>,
}

impl PhaseBarrier {
    pub fn new(expected: usize) -> Self {
        Self::build(expected, None)
    }

    pub fn with_callback(expected: usize, on_complete: impl Fn() + Send + Sync + 'static) -> Self {
        Self::build(expected, Some(Box::new(on_complete) as Callback))
    }

    fn build(expected: usize, on_complete: Option<Callback>) -> Self {
        assert!(expected > 0, "a barrier needs at least one party");
        Self {
            state: Mutex::new(BarrierState {
                expected,
                arrived: 0,
                dropped: 0,
                generation: 0,
            }),
            cv: Condvar::new(),
            on_complete,
        }
    }

    /// Block until all parties of the current cycle have arrived.
    pub fn arrive(&self) {
        let mut s = self.state.lock().unwrap();
        s.arrived += 1;
        if s.arrived >= s.expected {
            self.complete(&mut s);
            return;
        }
        let gen = s.generation;
        while s.generation == gen {
            s = self.cv.wait(s).unwrap();
        }
    }

    /// Arrive without waiting and leave the party set permanently.
    pub fn arrive_and_drop(&self) {
        let mut s = self.state.lock().unwrap();
        s.arrived += 1;
        s.dropped += 1;
        if s.arrived >= s.expected {
            self.complete(&mut s);
        }
    }

    /// Cycle completion. Runs under the mutex: the other parties are
    /// parked in `wait`, so the callback observes the barrier closed.
    fn complete(&self, s: &mut BarrierState) {
        if let Some(cb) = &self.on_complete {
            cb();
        }
        s.generation += 1;
        s.arrived = 0;
        s.expected -= s.dropped;
        s.dropped = 0;
        self.cv.notify_all();
    }
}
