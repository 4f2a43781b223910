//! World state: the player arena plus round/phase/outcome bookkeeping.
//!
//! `GameState` owns every `Player` in a fixed vector; a `PlayerId` is the
//! player's index. The state is shared behind an `RwLock`: agents take
//! short read guards to look at the world, only the moderator ever writes
//! (killing players, advancing rounds). Callers must drop any guard before
//! calling into the moderator, which keeps the lock order one-way.

use std::sync::{Arc, RwLock};

use crate::core::types::{Phase, PlayerId, Role, Team, Winner};

/// One seat at the table. Everything but `alive` is immutable after
/// construction; role-private state lives with the agent, not here.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub team: Team,
    pub alive: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            role,
            team: role.team(),
            alive: true,
        }
    }
}

#[derive(Debug)]
pub struct GameState {
    players: Vec<Player>,
    round: usize,
    phase: Phase,
    game_over: bool,
    winner: Winner,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            round: 1,
            phase: Phase::Day,
            game_over: false,
            winner: Winner::None,
        }
    }

    pub fn push_player(&mut self, name: String, role: Role) -> PlayerId {
        let id = self.players.len();
        self.players.push(Player::new(id, name, role));
        id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.players.get(id).map(|p| p.alive).unwrap_or(false)
    }

    /// Mark a player dead. Returns `true` on the `alive -> dead`
    /// transition, `false` if already dead or out of range.
    pub fn kill(&mut self, id: PlayerId) -> bool {
        match self.players.get_mut(id) {
            Some(p) if p.alive => {
                p.alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect()
    }

    pub fn alive_ids_except(&self, excluded: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive && p.id != excluded)
            .map(|p| p.id)
            .collect()
    }

    pub fn alive_town_except(&self, excluded: PlayerId) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.alive && p.team == Team::Town && p.id != excluded)
            .map(|p| p.id)
            .collect()
    }

    /// `(mafia, maniac, town)` head counts among the living.
    pub fn alive_team_counts(&self) -> (usize, usize, usize) {
        let mut maf = 0;
        let mut man = 0;
        let mut town = 0;
        for p in self.players.iter().filter(|p| p.alive) {
            match p.team {
                Team::Mafia => maf += 1,
                Team::Maniac => man += 1,
                Team::Town => town += 1,
            }
        }
        (maf, man, town)
    }

    /// Transcript tag: `#<id+1> <name>`. Ids are 1-based in all
    /// human-readable output.
    pub fn tag(&self, id: PlayerId) -> String {
        match self.players.get(id) {
            Some(p) => format!("#{} {}", id + 1, p.name),
            None => format!("#{}", id + 1),
        }
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn next_round(&mut self) {
        self.round += 1;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Winner {
        self.winner
    }

    pub fn set_game_over(&mut self, winner: Winner) {
        self.game_over = winner != Winner::None;
        self.winner = winner;
    }
}

/// Shared handle to the world; see the module docs for the guard rule.
pub type SharedState = Arc<RwLock<GameState>>;

pub fn shared(state: GameState) -> SharedState {
    Arc::new(RwLock::new(state))
}
