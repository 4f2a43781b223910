//! End-to-end match scenarios
//!
//! Full matches driven through the public engine entry point. The
//! cooperative backend is deterministic for a fixed seed, so these tests
//! can compare whole transcript sets byte for byte; the threaded backend
//! gets termination smoke coverage.

use std::path::{Path, PathBuf};

use mafia_sim::core::config::{Backend, GameConfig, TiePolicy};
use mafia_sim::engine::run_match;

fn fresh_logs_dir(tag: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("mafia-sim-e2e-{}-{tag}", std::process::id()));
    let _ = std::fs::remove_dir_all(&p);
    std::fs::create_dir_all(&p).unwrap();
    p
}

fn read_round_files(dir: &Path) -> Vec<(usize, String)> {
    let mut rounds = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if let Some(idx) = name
            .strip_prefix("round_")
            .and_then(|s| s.strip_suffix(".txt"))
            .and_then(|s| s.parse::<usize>().ok())
        {
            rounds.push((idx, std::fs::read_to_string(&path).unwrap()));
        }
    }
    rounds.sort_by_key(|(idx, _)| *idx);
    rounds
}

fn summary_of(dir: &Path) -> String {
    std::fs::read_to_string(dir.join("summary.txt")).expect("summary.txt written")
}

// ============================================================================
// Cooperative backend: outcomes and transcripts
// ============================================================================

#[test]
fn minimum_table_reaches_a_definite_outcome() {
    let dir = fresh_logs_dir("minimum");
    let cfg = GameConfig {
        n_players: 5,
        seed: 1,
        k_mafia_divisor: 4,
        executioner_count: 0,
        journalist_count: 0,
        eavesdropper_count: 0,
        backend: Backend::Coroutines,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };

    run_match(cfg).unwrap();

    let summary = summary_of(&dir);
    let definite = ["Winner: Town", "Winner: Mafia", "Winner: Maniac"];
    assert!(
        definite.iter().any(|w| summary.contains(w)),
        "a finished match must name a winner, got:\n{summary}"
    );
    assert!(!read_round_files(&dir).is_empty());
}

#[test]
fn cooperative_backend_is_deterministic() {
    let mk = |tag: &str| {
        let dir = fresh_logs_dir(tag);
        let cfg = GameConfig {
            n_players: 9,
            seed: 12345,
            backend: Backend::Coroutines,
            logs_dir: dir.display().to_string(),
            ..GameConfig::default()
        };
        run_match(cfg).unwrap();
        dir
    };

    let a = mk("det-a");
    let b = mk("det-b");

    let rounds_a = read_round_files(&a);
    let rounds_b = read_round_files(&b);
    assert!(!rounds_a.is_empty());
    assert_eq!(rounds_a, rounds_b, "same seed must replay the same match");
    assert_eq!(summary_of(&a), summary_of(&b));
}

#[test]
fn round_files_are_sequential_bom_prefixed_and_closed_once() {
    let dir = fresh_logs_dir("transcripts");
    let cfg = GameConfig {
        n_players: 9,
        seed: 777,
        backend: Backend::Coroutines,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    run_match(cfg).unwrap();

    let rounds = read_round_files(&dir);
    assert!(!rounds.is_empty());

    for (pos, (idx, text)) in rounds.iter().enumerate() {
        assert_eq!(*idx, pos + 1, "round indices must have no gaps");
        assert!(text.starts_with('\u{feff}'), "round file must be BOM-prefixed");
        let body = text.trim_start_matches('\u{feff}');
        assert!(body.starts_with(&format!("=== ROUND {idx} (Day) ===")));
        assert!(body.contains("Alive at start of day:"));
        assert_eq!(
            text.matches(&format!("=== ROUND {idx} END")).count(),
            1,
            "exactly one closing banner per round"
        );
    }
}

#[test]
fn summary_lists_every_player_with_the_winner_first() {
    let dir = fresh_logs_dir("summary");
    let cfg = GameConfig {
        n_players: 9,
        seed: 31337,
        backend: Backend::Coroutines,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    run_match(cfg).unwrap();

    let summary = summary_of(&dir);
    assert!(summary.starts_with('\u{feff}'));
    assert!(summary.contains("=== SUMMARY ==="));
    assert!(summary.contains("Winner: "));
    assert_eq!(summary.matches("Player_").count(), 9);
    for col in ["Died@Round", "VotesGiven", "MafiaVotes", "ManiacTargets"] {
        assert!(summary.contains(col), "summary table must carry column {col}");
    }
}

#[test]
fn tie_policy_random_match_completes() {
    let dir = fresh_logs_dir("tie-random");
    let cfg = GameConfig {
        n_players: 9,
        seed: 99,
        tie_policy: TiePolicy::Random,
        backend: Backend::Coroutines,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    run_match(cfg).unwrap();
    assert!(summary_of(&dir).contains("Winner: "));
}

// ============================================================================
// Threaded backend: termination smoke
// ============================================================================

#[test]
fn threaded_backend_terminates_and_writes_a_summary() {
    let dir = fresh_logs_dir("threaded");
    let cfg = GameConfig {
        n_players: 7,
        seed: 3,
        backend: Backend::Threads,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    run_match(cfg).unwrap();

    let summary = summary_of(&dir);
    assert!(summary.contains("Winner: "));
    assert!(!read_round_files(&dir).is_empty());
}

#[test]
fn threaded_backend_with_many_players_shuts_down_cleanly() {
    let dir = fresh_logs_dir("threaded-wide");
    let cfg = GameConfig {
        n_players: 24,
        seed: 8,
        backend: Backend::Threads,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    run_match(cfg).unwrap();
    assert!(summary_of(&dir).contains("Winner: "));
}

// ============================================================================
// Configuration failures
// ============================================================================

#[test]
fn too_many_roles_for_the_table_fails_before_the_match() {
    let dir = fresh_logs_dir("overflow");
    let cfg = GameConfig {
        n_players: 4,
        seed: 5,
        backend: Backend::Coroutines,
        logs_dir: dir.display().to_string(),
        ..GameConfig::default()
    };
    assert!(run_match(cfg).is_err());
    assert!(
        !dir.join("summary.txt").exists(),
        "a match that never started must not write a summary"
    );
}
