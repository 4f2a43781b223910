//! Match configuration.
//!
//! Values merge from three layers, later layers winning: built-in defaults,
//! a flat key/value config file (`--yaml <path>`), and explicit CLI options.
//! The file dialect is one `key: value` pair per line, `#` starts a comment,
//! blank lines are skipped, keys are case-insensitive. Unknown keys and
//! malformed values produce warnings and are otherwise ignored; only an
//! unreadable file is a hard error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Console verbosity for the engine's own announcements.
///
/// `Short` prints phase summaries only; `Full` additionally prints every
/// intent as it is submitted. Round files are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogMode {
    Short,
    Full,
}

/// Rule for breaking a multi-leader day vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiePolicy {
    /// Defer to an alive Executioner; if none decides, nobody is lynched.
    None,
    /// Uniform pick among the tied leaders by the moderator RNG.
    Random,
}

/// Which execution backend drives the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    Threads,
    Coroutines,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players, >= 1.
    pub n_players: usize,
    /// Global RNG seed; 0 means OS entropy.
    pub seed: u64,
    /// One interactive player replaces a random AI agent.
    pub human: bool,

    pub log_mode: LogMode,
    /// Open announcements reveal roles in console lynch/death lines.
    pub open_announcements: bool,
    /// Directory for round and summary files.
    pub logs_dir: String,

    pub tie_policy: TiePolicy,
    /// Mafia head-count divisor: `mafia = max(1, n / max(3, k))`.
    pub k_mafia_divisor: usize,

    /// Optional roles, 0 or 1 each.
    pub executioner_count: usize,
    pub journalist_count: usize,
    pub eavesdropper_count: usize,

    pub backend: Backend,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            n_players: 9,
            seed: 0,
            human: false,
            log_mode: LogMode::Short,
            open_announcements: false,
            logs_dir: "logs".to_string(),
            tie_policy: TiePolicy::None,
            k_mafia_divisor: 3,
            executioner_count: 1,
            journalist_count: 1,
            eavesdropper_count: 1,
            backend: Backend::Threads,
        }
    }
}

impl GameConfig {
    /// Reconcile incompatible settings; must run after all layers merged.
    ///
    /// The interactive player blocks on stdin, which the single-threaded
    /// cooperative driver cannot tolerate, so Human + Coroutines downgrades
    /// to the threaded backend.
    pub fn finalize(&mut self) {
        if self.human && self.backend == Backend::Coroutines {
            tracing::warn!("human player requires the threaded backend; downgrading");
            self.backend = Backend::Threads;
        }
    }

    /// Check ranges that make a match impossible to start.
    pub fn validate(&self) -> Result<()> {
        if self.n_players < 1 {
            return Err(SimError::Config("n_players must be >= 1".into()));
        }
        if self.k_mafia_divisor < 1 {
            return Err(SimError::Config("k_mafia_div must be >= 1".into()));
        }
        Ok(())
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Apply one `key: value` pair onto the config. Returns `false` when the
/// key is unknown.
fn apply_pair(cfg: &mut GameConfig, key: &str, val: &str, lineno: usize) -> bool {
    let warn_val = |what: &str| {
        tracing::warn!("config: line {lineno}: invalid {what}");
    };
    match key {
        "n_players" => match val.parse::<usize>() {
            Ok(v) if v >= 1 => cfg.n_players = v,
            _ => warn_val("n_players (int >= 1)"),
        },
        "seed" => match val.parse::<u64>() {
            Ok(v) => cfg.seed = v,
            _ => warn_val("seed (uint)"),
        },
        "human" => match parse_bool(val) {
            Some(v) => cfg.human = v,
            None => warn_val("human (bool)"),
        },
        "log" => match val.to_ascii_lowercase().as_str() {
            "short" => cfg.log_mode = LogMode::Short,
            "full" => cfg.log_mode = LogMode::Full,
            _ => warn_val("log (short|full)"),
        },
        "open" | "open_announcements" => match parse_bool(val) {
            Some(v) => cfg.open_announcements = v,
            None => warn_val("open (bool)"),
        },
        "logs_dir" => {
            if val.is_empty() {
                warn_val("logs_dir (non-empty)");
            } else {
                cfg.logs_dir = val.to_string();
            }
        }
        "tie" => match val.to_ascii_lowercase().as_str() {
            "none" => cfg.tie_policy = TiePolicy::None,
            "random" => cfg.tie_policy = TiePolicy::Random,
            _ => warn_val("tie (none|random)"),
        },
        "k_mafia_div" | "k_mafia_divisor" => match val.parse::<usize>() {
            Ok(v) if v >= 1 => cfg.k_mafia_divisor = v,
            _ => warn_val("k_mafia_div (int >= 1)"),
        },
        "executioner_count" => match val.parse::<usize>() {
            Ok(v @ (0 | 1)) => cfg.executioner_count = v,
            _ => warn_val("executioner_count (0 or 1)"),
        },
        "journalist_count" => match val.parse::<usize>() {
            Ok(v @ (0 | 1)) => cfg.journalist_count = v,
            _ => warn_val("journalist_count (0 or 1)"),
        },
        "eavesdropper_count" => match val.parse::<usize>() {
            Ok(v @ (0 | 1)) => cfg.eavesdropper_count = v,
            _ => warn_val("eavesdropper_count (0 or 1)"),
        },
        "use_coroutines" => match parse_bool(val) {
            Some(true) => cfg.backend = Backend::Coroutines,
            Some(false) => cfg.backend = Backend::Threads,
            None => warn_val("use_coroutines (bool)"),
        },
        "engine" => match val.to_ascii_lowercase().as_str() {
            "coro" => cfg.backend = Backend::Coroutines,
            "threads" => cfg.backend = Backend::Threads,
            _ => warn_val("engine (coro|threads)"),
        },
        _ => return false,
    }
    true
}

/// Load overrides from a flat key/value file onto `cfg`.
pub fn load_config_file(path: &Path, cfg: &mut GameConfig) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;

    tracing::info!("config: loading overrides from {}", path.display());

    for (i, raw) in text.lines().enumerate() {
        let lineno = i + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, val)) = line.split_once(':') else {
            tracing::warn!("config: line {lineno}: missing ':'");
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let val = val.trim();

        if !apply_pair(cfg, &key, val, lineno) {
            tracing::warn!("config: line {lineno}: unknown key '{key}'");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load_str(text: &str) -> GameConfig {
        let file = tempfile_path();
        std::fs::File::create(&file)
            .and_then(|mut f| f.write_all(text.as_bytes()))
            .unwrap();
        let mut cfg = GameConfig::default();
        load_config_file(&file, &mut cfg).unwrap();
        std::fs::remove_file(&file).ok();
        cfg
    }

    fn tempfile_path() -> std::path::PathBuf {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let mut p = std::env::temp_dir();
        p.push(format!(
            "mafia-sim-cfg-{}-{}.txt",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        p
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.n_players, 9);
        assert_eq!(cfg.seed, 0);
        assert_eq!(cfg.logs_dir, "logs");
        assert_eq!(cfg.tie_policy, TiePolicy::None);
        assert_eq!(cfg.k_mafia_divisor, 3);
        assert_eq!(cfg.executioner_count, 1);
    }

    #[test]
    fn parses_known_keys_case_insensitively() {
        let cfg = load_str(
            "N_PLAYERS: 12\n\
             seed: 77\n\
             Human: yes\n\
             log: full\n\
             open: on\n\
             tie: random\n\
             K_MAFIA_DIV: 4\n\
             engine: coro\n",
        );
        assert_eq!(cfg.n_players, 12);
        assert_eq!(cfg.seed, 77);
        assert!(cfg.human);
        assert_eq!(cfg.log_mode, LogMode::Full);
        assert!(cfg.open_announcements);
        assert_eq!(cfg.tie_policy, TiePolicy::Random);
        assert_eq!(cfg.k_mafia_divisor, 4);
        assert_eq!(cfg.backend, Backend::Coroutines);
    }

    #[test]
    fn malformed_values_are_skipped() {
        let cfg = load_str(
            "# comment line\n\
             \n\
             n_players: zero\n\
             seed: -3\n\
             tie: coinflip\n\
             executioner_count: 2\n\
             mystery_key: 1\n",
        );
        // every bad line leaves the default intact
        let def = GameConfig::default();
        assert_eq!(cfg.n_players, def.n_players);
        assert_eq!(cfg.seed, def.seed);
        assert_eq!(cfg.tie_policy, def.tie_policy);
        assert_eq!(cfg.executioner_count, def.executioner_count);
    }

    #[test]
    fn inline_comments_are_stripped() {
        let cfg = load_str("n_players: 6  # small table\n");
        assert_eq!(cfg.n_players, 6);
    }

    #[test]
    fn human_downgrades_coroutines() {
        let mut cfg = GameConfig {
            human: true,
            backend: Backend::Coroutines,
            ..GameConfig::default()
        };
        cfg.finalize();
        assert_eq!(cfg.backend, Backend::Threads);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let mut cfg = GameConfig::default();
        let err = load_config_file(Path::new("/nonexistent/mafia.cfg"), &mut cfg);
        assert!(err.is_err());
    }
}
