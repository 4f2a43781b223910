//! Role behaviours: per-role agent logic plus enum dispatch.
//!
//! Every agent owns its id, a shared read view of the world, its own RNG
//! stream and a `Brain` carrying role-private memory. The three phase
//! hooks (`on_day`, `vote_day`, `on_night`) dispatch on the brain variant;
//! `decide_execution` is the Executioner-only capability consulted by the
//! moderator on a day-vote tie.

mod citizen;
mod detective;
mod doctor;
mod eavesdropper;
mod executioner;
mod human;
mod journalist;
mod mafia;
mod maniac;

use std::sync::{Arc, Mutex};

use crate::core::rng::GameRng;
use crate::core::types::{PlayerId, Role};
use crate::moderator::Moderator;
use crate::state::SharedState;

/// Shared registry of agents; indexed by `PlayerId`. Each agent's mutex is
/// only contended when the moderator consults an Executioner during tie
/// resolution, which happens while every agent is parked at a barrier.
pub type AgentVec = Arc<Vec<Mutex<Agent>>>;

/// Role-private state. Variants without memory carry none.
pub enum Brain {
    Citizen,
    Mafia,
    Detective(detective::Memory),
    Doctor(doctor::Memory),
    Maniac,
    Executioner,
    Journalist,
    Eavesdropper,
    Human(human::Console),
}

/// What an agent can see and randomize with while deciding. Helpers take
/// and release the state read lock internally, so no guard is ever held
/// across a moderator call.
pub(crate) struct Ctx<'a> {
    pub id: PlayerId,
    pub state: &'a SharedState,
    pub rng: &'a mut GameRng,
}

impl Ctx<'_> {
    fn alive_except_self(&self) -> Vec<PlayerId> {
        self.state.read().unwrap().alive_ids_except(self.id)
    }

    fn alive_including_self(&self) -> Vec<PlayerId> {
        self.state.read().unwrap().alive_ids()
    }

    /// Uniform alive target other than self; self when nobody else lives.
    fn random_alive_except_self(&mut self) -> PlayerId {
        let cands = self.alive_except_self();
        self.rng.pick(&cands).unwrap_or(self.id)
    }

    /// Uniform alive Town target other than self, falling back to any
    /// alive non-self target.
    fn random_alive_town_except_self(&mut self) -> PlayerId {
        let town = self.state.read().unwrap().alive_town_except(self.id);
        match self.rng.pick(&town) {
            Some(t) => t,
            None => self.random_alive_except_self(),
        }
    }
}

pub struct Agent {
    pub id: PlayerId,
    state: SharedState,
    rng: GameRng,
    brain: Brain,
}

impl Agent {
    /// AI agent for `role`.
    pub fn new_ai(id: PlayerId, role: Role, state: SharedState, rng: GameRng) -> Self {
        let brain = match role {
            Role::Citizen => Brain::Citizen,
            Role::Mafia => Brain::Mafia,
            Role::Detective => Brain::Detective(detective::Memory::default()),
            Role::Doctor => Brain::Doctor(doctor::Memory::default()),
            Role::Maniac => Brain::Maniac,
            Role::Executioner => Brain::Executioner,
            Role::Journalist => Brain::Journalist,
            Role::Eavesdropper => Brain::Eavesdropper,
        };
        Self { id, state, rng, brain }
    }

    /// Interactive agent playing `role` over the console.
    pub fn new_human(id: PlayerId, role: Role, state: SharedState, rng: GameRng) -> Self {
        Self {
            id,
            state,
            rng,
            brain: Brain::Human(human::Console::new(role)),
        }
    }

    /// Day speech phase. No AI role acts here.
    pub fn on_day(&mut self, _m: &Moderator) {}

    /// Pick a lynch-vote target. The engine sanitises the result before
    /// submission, so a faulty choice costs nothing.
    pub fn vote_day(&mut self, _m: &Moderator) -> PlayerId {
        let Agent { id, state, rng, brain } = self;
        let mut cx = Ctx { id: *id, state, rng };
        match brain {
            Brain::Citizen => citizen::vote_day(&mut cx),
            Brain::Mafia => mafia::vote_day(&mut cx),
            Brain::Detective(mem) => detective::vote_day(&mut cx, mem),
            Brain::Doctor(_) => cx.random_alive_except_self(),
            Brain::Maniac => cx.random_alive_except_self(),
            Brain::Executioner => cx.random_alive_except_self(),
            Brain::Journalist => cx.random_alive_except_self(),
            Brain::Eavesdropper => cx.random_alive_except_self(),
            Brain::Human(console) => human::vote_day(&mut cx, console),
        }
    }

    /// Night action phase; submits intents to the moderator.
    pub fn on_night(&mut self, m: &Moderator) {
        let Agent { id, state, rng, brain } = self;
        let mut cx = Ctx { id: *id, state, rng };
        match brain {
            Brain::Citizen | Brain::Executioner => {}
            Brain::Mafia => mafia::night(&mut cx, m),
            Brain::Detective(mem) => detective::night(&mut cx, mem, m),
            Brain::Doctor(mem) => doctor::night(&mut cx, mem, m),
            Brain::Maniac => maniac::night(&mut cx, m),
            Brain::Journalist => journalist::night(&mut cx, m),
            Brain::Eavesdropper => eavesdropper::night(&mut cx, m),
            Brain::Human(console) => human::night(&mut cx, console, m),
        }
    }

    /// Tie-break capability: pick one of the tied leaders to execute, or
    /// abstain. Only Executioners answer; dead agents always abstain.
    pub fn decide_execution(&mut self, leaders: &[PlayerId]) -> Option<PlayerId> {
        if leaders.is_empty() || !self.state.read().unwrap().is_alive(self.id) {
            return None;
        }
        let Agent { id, state, rng, brain } = self;
        let mut cx = Ctx { id: *id, state, rng };
        match brain {
            Brain::Executioner => executioner::decide(&mut cx, leaders),
            Brain::Human(console) if console.role() == Role::Executioner => {
                human::decide_execution(&mut cx, leaders)
            }
            _ => None,
        }
    }

    /// Clamp a day-vote choice to a valid alive non-self target, picking
    /// uniformly from the agent's own stream when the choice is invalid.
    pub fn sanitize_day_target(&mut self, wanted: PlayerId) -> PlayerId {
        let valid = {
            let st = self.state.read().unwrap();
            wanted != self.id && st.is_alive(wanted)
        };
        if valid {
            return wanted;
        }
        let cands = self.state.read().unwrap().alive_ids_except(self.id);
        self.rng.pick(&cands).unwrap_or(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{shared, GameState};

    fn agents_for(roles: &[Role]) -> (SharedState, Vec<Agent>) {
        let mut st = GameState::new();
        for (i, &r) in roles.iter().enumerate() {
            st.push_player(format!("Player_{}", i + 1), r);
        }
        let state = shared(st);
        let agents = roles
            .iter()
            .enumerate()
            .map(|(i, &r)| Agent::new_ai(i, r, state.clone(), GameRng::seeded(100 + i as u64)))
            .collect();
        (state, agents)
    }

    #[test]
    fn sanitize_keeps_valid_votes() {
        let (_state, mut agents) = agents_for(&[Role::Citizen, Role::Citizen, Role::Mafia]);
        assert_eq!(agents[0].sanitize_day_target(2), 2);
    }

    #[test]
    fn sanitize_replaces_self_and_dead_votes() {
        let (state, mut agents) =
            agents_for(&[Role::Citizen, Role::Citizen, Role::Mafia, Role::Doctor]);
        state.write().unwrap().kill(1);

        for _ in 0..16 {
            let t = agents[0].sanitize_day_target(0);
            assert_ne!(t, 0, "self vote must be replaced");
            assert_ne!(t, 1, "dead target must be replaced");
        }
    }

    #[test]
    fn non_executioners_abstain_from_ties() {
        let (_state, mut agents) = agents_for(&[Role::Citizen, Role::Mafia, Role::Detective]);
        for a in &mut agents {
            assert_eq!(a.decide_execution(&[0, 1]), None);
        }
    }

    #[test]
    fn dead_executioner_abstains() {
        let (state, mut agents) = agents_for(&[Role::Executioner, Role::Citizen, Role::Mafia]);
        state.write().unwrap().kill(0);
        assert_eq!(agents[0].decide_execution(&[1, 2]), None);
    }

    #[test]
    fn executioner_choice_is_a_leader_or_abstain() {
        let (_state, mut agents) =
            agents_for(&[Role::Executioner, Role::Citizen, Role::Mafia, Role::Citizen]);
        let leaders = [1, 3];
        for _ in 0..32 {
            match agents[0].decide_execution(&leaders) {
                None => {}
                Some(v) => assert!(leaders.contains(&v)),
            }
        }
    }
}
