//! Engine orchestration: build the table, then drive rounds until a
//! terminal outcome.
//!
//! Both backends share the same construction (role census, shuffled role
//! bag, per-agent RNG streams, moderator) and the same resolution core;
//! they differ only in how agents are scheduled between the four phase
//! barriers of a round.

mod cooperative;
mod threaded;

use std::sync::{Arc, Mutex};

use crate::core::config::{Backend, GameConfig};
use crate::core::error::{Result, SimError};
use crate::core::rng::{agent_seed, GameRng};
use crate::core::types::{Role, Winner};
use crate::moderator::Moderator;
use crate::roles::{Agent, AgentVec};
use crate::state::{shared, GameState, SharedState};

/// Run one full match with the configured backend.
pub fn run_match(cfg: GameConfig) -> Result<()> {
    cfg.validate()?;
    match cfg.backend {
        Backend::Threads => threaded::run(cfg),
        Backend::Coroutines => cooperative::run(cfg),
    }
}

/// Everything a backend needs to drive a match.
pub(crate) struct MatchSetup {
    pub state: SharedState,
    pub agents: AgentVec,
    pub moderator: Arc<Moderator>,
    pub n: usize,
}

/// Role census for `n` players:
/// `mafia = max(1, n / max(3, k_div))`, one Detective, one Doctor, one
/// Maniac, the configured optional roles, Citizens for the rest.
pub(crate) fn role_bag(cfg: &GameConfig) -> Result<Vec<Role>> {
    let total = cfg.n_players;
    let mafia = std::cmp::max(1, total / std::cmp::max(3, cfg.k_mafia_divisor));

    let executioners = cfg.executioner_count.min(1);
    let journalists = cfg.journalist_count.min(1);
    let eavesdroppers = cfg.eavesdropper_count.min(1);

    let fixed = mafia + 3 + executioners + journalists + eavesdroppers;
    if fixed > total {
        return Err(SimError::RoleOverflow {
            required: fixed,
            available: total,
        });
    }

    let mut bag = Vec::with_capacity(total);
    bag.extend(std::iter::repeat(Role::Mafia).take(mafia));
    bag.push(Role::Detective);
    bag.push(Role::Doctor);
    bag.push(Role::Maniac);
    bag.extend(std::iter::repeat(Role::Executioner).take(executioners));
    bag.extend(std::iter::repeat(Role::Journalist).take(journalists));
    bag.extend(std::iter::repeat(Role::Eavesdropper).take(eavesdroppers));
    bag.extend(std::iter::repeat(Role::Citizen).take(total - fixed));
    Ok(bag)
}

/// Build the arena, the agents and the moderator.
///
/// The global RNG shuffles the role bag and picks the human seat, then
/// moves into the moderator as its tie-break stream; each agent gets its
/// own stream derived from the global seed and its index.
pub(crate) fn build_match(cfg: &GameConfig) -> Result<MatchSetup> {
    if cfg.n_players == 0 {
        return Err(SimError::NoPlayers);
    }

    let mut rng = GameRng::seeded(cfg.seed);
    let mut bag = role_bag(cfg)?;
    rng.shuffle(&mut bag);

    let human_idx = if cfg.human {
        Some(rng.uniform(0, bag.len() - 1))
    } else {
        None
    };

    let mut gs = GameState::new();
    for (i, &role) in bag.iter().enumerate() {
        let name = if human_idx == Some(i) {
            "You".to_string()
        } else {
            format!("Player_{}", i + 1)
        };
        gs.push_player(name, role);
    }
    let state = shared(gs);

    let agents: AgentVec = Arc::new(
        bag.iter()
            .enumerate()
            .map(|(i, &role)| {
                let arng = GameRng::seeded(agent_seed(cfg.seed, i));
                let agent = if human_idx == Some(i) {
                    Agent::new_human(i, role, state.clone(), arng)
                } else {
                    Agent::new_ai(i, role, state.clone(), arng)
                };
                Mutex::new(agent)
            })
            .collect(),
    );

    let moderator = Arc::new(Moderator::new(
        cfg.clone(),
        state.clone(),
        agents.clone(),
        rng,
    ));

    let n = bag.len();
    tracing::info!(
        "players initialized: {n}{}",
        if cfg.human { " (with 1 human)" } else { "" }
    );

    Ok(MatchSetup {
        state,
        agents,
        moderator,
        n,
    })
}

/// Check for a terminal outcome; on game over, record the winner and
/// flush the pending round file plus the summary.
pub(crate) fn check_end(moderator: &Moderator, state: &SharedState) -> bool {
    let w = moderator.evaluate_winner();
    if w == Winner::None {
        return false;
    }
    state.write().unwrap().set_game_over(w);
    tracing::info!("Game over. Winner: {w}");
    moderator.finalize_round_file_if_pending();
    moderator.write_summary_file();
    true
}

/// Day segment of one agent: speech, vote, sanitised submission.
/// Shared verbatim by both backends.
pub(crate) fn agent_day_actions(
    id: usize,
    agents: &AgentVec,
    moderator: &Moderator,
    state: &SharedState,
) {
    if !state.read().unwrap().is_alive(id) {
        return;
    }
    let target = {
        let mut agent = agents[id].lock().unwrap();
        agent.on_day(moderator);
        let wanted = agent.vote_day(moderator);
        agent.sanitize_day_target(wanted)
    };
    moderator.submit_day_vote(id, target);
}

/// Night segment of one agent.
pub(crate) fn agent_night_actions(
    id: usize,
    agents: &AgentVec,
    moderator: &Moderator,
    state: &SharedState,
) {
    if !state.read().unwrap().is_alive(id) {
        return;
    }
    agents[id].lock().unwrap().on_night(moderator);
}
