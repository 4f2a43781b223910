//! Integration tests for moderator resolution
//!
//! These drive the moderator directly: build a table with known roles,
//! submit intents by hand, resolve, and check the journal plus the world
//! state. Covers the day-tie paths, heal cancellation, concurrent night
//! kills and both information roles.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use mafia_sim::core::config::{GameConfig, TiePolicy};
use mafia_sim::core::rng::GameRng;
use mafia_sim::core::types::{Role, Winner};
use mafia_sim::moderator::Moderator;
use mafia_sim::roles::{Agent, AgentVec};
use mafia_sim::state::{shared, GameState, SharedState};

fn temp_logs_dir(tag: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mafia-sim-test-{}-{tag}", std::process::id()));
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn table(roles: &[Role], tie: TiePolicy, tag: &str) -> (SharedState, Moderator) {
    let mut gs = GameState::new();
    for (i, &r) in roles.iter().enumerate() {
        gs.push_player(format!("Player_{}", i + 1), r);
    }
    let state = shared(gs);

    let agents: AgentVec = Arc::new(
        roles
            .iter()
            .enumerate()
            .map(|(i, &r)| {
                Mutex::new(Agent::new_ai(i, r, state.clone(), GameRng::seeded(1000 + i as u64)))
            })
            .collect(),
    );

    let cfg = GameConfig {
        n_players: roles.len(),
        tie_policy: tie,
        logs_dir: temp_logs_dir(tag).display().to_string(),
        executioner_count: roles.iter().filter(|&&r| r == Role::Executioner).count(),
        ..GameConfig::default()
    };
    let moderator = Moderator::new(cfg, state.clone(), agents, GameRng::seeded(999));
    (state, moderator)
}

// ============================================================================
// Day resolution
// ============================================================================

#[test]
fn unanimous_vote_lynches_the_target() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Citizen, Role::Mafia],
        TiePolicy::None,
        "lynch",
    );
    m.begin_day();
    m.submit_day_vote(0, 3);
    m.submit_day_vote(1, 3);
    m.submit_day_vote(2, 3);
    m.submit_day_vote(3, 0);

    assert_eq!(m.resolve_day_lynch(), Some(3));
    assert!(!state.read().unwrap().is_alive(3));
    assert!(m.round_journal().contains("DAY: lynch victim #4 Player_4 (Mafia)"));
}

#[test]
fn last_vote_wins_per_voter() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Citizen, Role::Mafia],
        TiePolicy::None,
        "revote",
    );
    m.begin_day();
    // Voter 0 changes its mind; only the final ballot counts.
    m.submit_day_vote(0, 1);
    m.submit_day_vote(0, 3);
    m.submit_day_vote(1, 3);
    m.submit_day_vote(2, 3);

    assert_eq!(m.resolve_day_lynch(), Some(3));
    assert!(state.read().unwrap().is_alive(1));
}

#[test]
fn no_votes_means_no_lynch() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Mafia],
        TiePolicy::None,
        "novotes",
    );
    m.begin_day();
    assert_eq!(m.resolve_day_lynch(), None);
    assert!(m.round_journal().contains("DAY: no lynch"));
    assert_eq!(state.read().unwrap().alive_ids().len(), 3);
}

#[test]
fn tie_with_policy_none_and_no_executioner_spares_both() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Citizen, Role::Mafia, Role::Citizen],
        TiePolicy::None,
        "tie-none",
    );
    m.begin_day();
    // tally[2] = 2 (voters 0, 1), tally[0] = 2 (voters 2, 3)
    m.submit_day_vote(0, 2);
    m.submit_day_vote(1, 2);
    m.submit_day_vote(2, 0);
    m.submit_day_vote(3, 0);

    assert_eq!(m.resolve_day_lynch(), None);
    assert!(m.round_journal().contains("DAY: tie -> no lynch"));
    let st = state.read().unwrap();
    assert!(st.is_alive(0));
    assert!(st.is_alive(2));
}

#[test]
fn tie_with_policy_random_kills_exactly_one_leader() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Citizen, Role::Mafia, Role::Citizen],
        TiePolicy::Random,
        "tie-random",
    );
    m.begin_day();
    m.submit_day_vote(0, 2);
    m.submit_day_vote(1, 2);
    m.submit_day_vote(2, 0);
    m.submit_day_vote(3, 0);

    let victim = m.resolve_day_lynch().expect("random tie policy always lynches");
    assert!(victim == 0 || victim == 2);
    assert!(m.round_journal().contains("DAY: tie -> victim chosen randomly"));

    let st = state.read().unwrap();
    assert_eq!(!st.is_alive(0) as u8 + !st.is_alive(2) as u8, 1);
}

#[test]
fn tie_with_executioner_either_lynches_a_leader_or_spares_all() {
    let (state, m) = table(
        &[
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
            Role::Mafia,
            Role::Executioner,
        ],
        TiePolicy::None,
        "tie-exec",
    );
    m.begin_day();
    m.submit_day_vote(0, 2);
    m.submit_day_vote(1, 2);
    m.submit_day_vote(2, 0);
    m.submit_day_vote(3, 0);

    match m.resolve_day_lynch() {
        Some(victim) => {
            assert!(victim == 0 || victim == 2);
            assert!(m.round_journal().contains("DAY: executioner-lynch"));
            assert!(!state.read().unwrap().is_alive(victim));
        }
        None => {
            assert!(m.round_journal().contains("DAY: executioner abstains"));
            assert!(m.round_journal().contains("DAY: tie -> no lynch"));
            assert!(state.read().unwrap().is_alive(0));
            assert!(state.read().unwrap().is_alive(2));
        }
    }
}

// ============================================================================
// Intent validation
// ============================================================================

#[test]
fn invalid_intents_are_silently_dropped() {
    let (state, m) = table(
        &[Role::Citizen, Role::Citizen, Role::Mafia, Role::Doctor],
        TiePolicy::None,
        "invalid",
    );
    state.write().unwrap().kill(1);
    m.begin_day();
    let header = m.round_journal();

    m.submit_day_vote(1, 0); // dead voter
    m.submit_day_vote(0, 1); // dead target
    m.submit_day_vote(0, 0); // self vote
    m.submit_day_vote(0, 99); // out of range
    m.mafia_vote_target(0, 2); // not a mafioso
    m.set_maniac_target(2, 0); // not the maniac
    m.set_journalist_compare(3, 0, 0); // duplicate targets
    m.set_eavesdropper_target(3, 3); // self target

    assert_eq!(m.round_journal(), header, "every invalid intent must leave no trace");
    assert_eq!(m.resolve_day_lynch(), None);
}

// ============================================================================
// Night resolution
// ============================================================================

#[test]
fn heal_cancels_the_mafia_kill() {
    let (state, m) = table(
        &[Role::Mafia, Role::Doctor, Role::Citizen, Role::Maniac, Role::Detective],
        TiePolicy::None,
        "heal",
    );
    m.begin_day();
    m.mafia_vote_target(0, 2);
    m.set_doctor_heal(1, 2);

    let deaths = m.resolve_night();
    assert!(deaths.is_empty());
    assert!(state.read().unwrap().is_alive(2));
    let journal = m.round_journal();
    assert!(journal.contains("NIGHT: marked-by-mafia #3 Player_3"));
    assert!(journal.contains("NIGHT: heal-cancels #3 Player_3"));
}

#[test]
fn heal_cancels_every_mark_on_its_target() {
    let (state, m) = table(
        &[Role::Mafia, Role::Doctor, Role::Citizen, Role::Maniac, Role::Detective],
        TiePolicy::None,
        "heal-all",
    );
    m.begin_day();
    m.mafia_vote_target(0, 2);
    m.set_maniac_target(3, 2);
    m.set_detective_shot(4, 2);
    m.set_doctor_heal(1, 2);

    assert!(m.resolve_night().is_empty());
    assert!(state.read().unwrap().is_alive(2));
}

#[test]
fn concurrent_night_kills_all_land() {
    let (state, m) = table(
        &[
            Role::Mafia,
            Role::Detective,
            Role::Doctor,
            Role::Maniac,
            Role::Citizen,
            Role::Citizen,
            Role::Citizen,
        ],
        TiePolicy::None,
        "three-kills",
    );
    m.begin_day();
    m.mafia_vote_target(0, 4);
    m.set_detective_shot(1, 5);
    m.set_maniac_target(3, 6);

    let deaths = m.resolve_night();
    assert_eq!(deaths, vec![4, 5, 6]);

    let journal = m.round_journal();
    assert!(journal.contains("NIGHT: marked-by-mafia #5 Player_5"));
    assert!(journal.contains("NIGHT: marked-by-detective #6 Player_6"));
    assert!(journal.contains("NIGHT: marked-by-maniac #7 Player_7"));
    assert_eq!(journal.matches("NIGHT: death ").count(), 3);

    let st = state.read().unwrap();
    assert!(!st.is_alive(4) && !st.is_alive(5) && !st.is_alive(6));
}

#[test]
fn mafia_tally_majority_beats_minority() {
    let (state, m) = table(
        &[
            Role::Mafia,
            Role::Mafia,
            Role::Mafia,
            Role::Detective,
            Role::Doctor,
            Role::Maniac,
            Role::Citizen,
        ],
        TiePolicy::None,
        "tally",
    );
    m.begin_day();
    m.mafia_vote_target(0, 6);
    m.mafia_vote_target(1, 6);
    m.mafia_vote_target(2, 3);

    let deaths = m.resolve_night();
    assert_eq!(deaths, vec![6]);
    assert!(m.round_journal().contains("NIGHT: mafia-tally #4 Player_4(1) #7 Player_7(2)"));
    assert!(!state.read().unwrap().is_alive(6));
}

#[test]
fn journalist_same_team_result_has_no_side_effects() {
    let (state, m) = table(
        &[
            Role::Journalist,
            Role::Citizen,
            Role::Detective,
            Role::Mafia,
            Role::Doctor,
            Role::Maniac,
        ],
        TiePolicy::None,
        "journalist",
    );
    m.begin_day();
    m.set_journalist_compare(0, 1, 2); // Town vs Town
    m.set_journalist_compare(0, 1, 3); // Town vs Mafia

    let deaths = m.resolve_night();
    assert!(deaths.is_empty());
    assert_eq!(state.read().unwrap().alive_ids().len(), 6);

    let journal = m.round_journal();
    assert!(journal.contains("-> #2 Player_2 vs #3 Player_3 : SAME"));
    assert!(journal.contains("-> #2 Player_2 vs #4 Player_4 : DIFFERENT"));
}

#[test]
fn eavesdropper_sees_every_action_on_its_target_or_none() {
    let (_state, m) = table(
        &[
            Role::Eavesdropper,
            Role::Mafia,
            Role::Doctor,
            Role::Citizen,
            Role::Maniac,
            Role::Detective,
            Role::Citizen,
        ],
        TiePolicy::None,
        "eavesdrop",
    );
    m.begin_day();
    m.mafia_vote_target(1, 3);
    m.set_doctor_heal(2, 3);
    m.set_eavesdropper_target(0, 3);
    m.set_eavesdropper_target(0, 6);

    m.resolve_night();
    let journal = m.round_journal();
    assert!(journal
        .contains("NIGHT: eavesdropper-result for #4 Player_4 by #1 Player_1 -> mafia(1), doc-heal"));
    assert!(journal.contains("NIGHT: eavesdropper-result for #7 Player_7 by #1 Player_1 -> none"));
}

// ============================================================================
// Termination check
// ============================================================================

#[test]
fn winner_priority_table() {
    // Town: no mafia, no maniac.
    let (state, m) = table(
        &[Role::Citizen, Role::Mafia, Role::Maniac],
        TiePolicy::None,
        "win-town",
    );
    state.write().unwrap().kill(1);
    state.write().unwrap().kill(2);
    assert_eq!(m.evaluate_winner(), Winner::Town);

    // Maniac: exactly maniac + one townsperson, no mafia.
    let (state, m) = table(
        &[Role::Citizen, Role::Mafia, Role::Maniac],
        TiePolicy::None,
        "win-maniac",
    );
    state.write().unwrap().kill(1);
    assert_eq!(m.evaluate_winner(), Winner::Maniac);

    // Mafia: parity with everyone else.
    let (state, m) = table(
        &[Role::Mafia, Role::Citizen, Role::Citizen],
        TiePolicy::None,
        "win-mafia",
    );
    state.write().unwrap().kill(1);
    assert_eq!(m.evaluate_winner(), Winner::Mafia);

    // Still running.
    let (_state, m) = table(
        &[Role::Mafia, Role::Citizen, Role::Citizen],
        TiePolicy::None,
        "win-none",
    );
    assert_eq!(m.evaluate_winner(), Winner::None);
}
