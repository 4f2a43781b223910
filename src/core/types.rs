//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};

/// Player identifier: the player's index in the arena vector.
///
/// Ids are dense (`0..n_players`) and never reused; dead players keep
/// their slot.
pub type PlayerId = usize;

/// Faction a role fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Town,
    Mafia,
    Maniac,
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Team::Town => "Town",
            Team::Mafia => "Mafia",
            Team::Maniac => "Maniac",
        };
        f.write_str(s)
    }
}

/// Role catalogue.
///
/// Citizen/Mafia/Detective/Doctor/Maniac are the mandatory core;
/// Executioner, Journalist and Eavesdropper are optional extras toggled
/// from configuration (at most one of each per match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Citizen,
    Mafia,
    Detective,
    Doctor,
    Maniac,
    Executioner,
    Journalist,
    Eavesdropper,
}

impl Role {
    /// Fixed team assignment of the role.
    pub fn team(self) -> Team {
        match self {
            Role::Mafia => Team::Mafia,
            Role::Maniac => Team::Maniac,
            Role::Citizen
            | Role::Detective
            | Role::Doctor
            | Role::Executioner
            | Role::Journalist
            | Role::Eavesdropper => Team::Town,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Citizen => "Citizen",
            Role::Mafia => "Mafia",
            Role::Detective => "Detective",
            Role::Doctor => "Doctor",
            Role::Maniac => "Maniac",
            Role::Executioner => "Executioner",
            Role::Journalist => "Journalist",
            Role::Eavesdropper => "Eavesdropper",
        };
        f.write_str(s)
    }
}

/// Half of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Day,
    Night,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Day => "Day",
            Phase::Night => "Night",
        })
    }
}

/// Terminal outcome of a match. `None` while the match is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    None,
    Town,
    Mafia,
    Maniac,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Winner::None => "None",
            Winner::Town => "Town",
            Winner::Mafia => "Mafia",
            Winner::Maniac => "Maniac",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_assignment_is_fixed() {
        assert_eq!(Role::Citizen.team(), Team::Town);
        assert_eq!(Role::Detective.team(), Team::Town);
        assert_eq!(Role::Doctor.team(), Team::Town);
        assert_eq!(Role::Executioner.team(), Team::Town);
        assert_eq!(Role::Journalist.team(), Team::Town);
        assert_eq!(Role::Eavesdropper.team(), Team::Town);
        assert_eq!(Role::Mafia.team(), Team::Mafia);
        assert_eq!(Role::Maniac.team(), Team::Maniac);
    }

    #[test]
    fn display_names_match_transcript_vocabulary() {
        assert_eq!(Role::Eavesdropper.to_string(), "Eavesdropper");
        assert_eq!(Team::Maniac.to_string(), "Maniac");
        assert_eq!(Winner::None.to_string(), "None");
    }
}
