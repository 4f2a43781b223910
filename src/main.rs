//! mafia-sim - Entry Point
//!
//! Parses the CLI, merges configuration layers (defaults, optional flat
//! key/value file, CLI overrides), then runs one full match on the
//! selected backend. Exit codes: 0 on success, 1 for configuration
//! errors, 2 for runtime failures.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use mafia_sim::core::config::{load_config_file, Backend, GameConfig, LogMode, TiePolicy};
use mafia_sim::engine::run_match;

/// Discrete-turn Mafia social-deduction match simulator
#[derive(Parser, Debug)]
#[command(name = "mafia-sim")]
#[command(about = "Play out one Mafia match between autonomous agents")]
struct Args {
    /// Number of players
    #[arg(long = "n")]
    n_players: Option<usize>,

    /// RNG seed (0 = OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable one interactive human player
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    human: Option<bool>,

    /// Console log verbosity
    #[arg(long, value_parser = ["short", "full"])]
    log: Option<String>,

    /// Open announcements (show roles/targets in console logs)
    #[arg(long)]
    open: bool,

    /// Directory for round and summary files
    #[arg(long = "logs-dir")]
    logs_dir: Option<String>,

    /// Day tie policy
    #[arg(long, value_parser = ["none", "random"])]
    tie: Option<String>,

    /// Mafia divisor: mafia = max(1, n / max(3, k))
    #[arg(long = "k-mafia-div")]
    k_mafia_div: Option<usize>,

    /// Executioner count (0 or 1)
    #[arg(long = "exec", value_parser = clap::value_parser!(u8).range(0..=1))]
    executioners: Option<u8>,

    /// Journalist count (0 or 1)
    #[arg(long = "journ", value_parser = clap::value_parser!(u8).range(0..=1))]
    journalists: Option<u8>,

    /// Eavesdropper count (0 or 1)
    #[arg(long = "ears", value_parser = clap::value_parser!(u8).range(0..=1))]
    eavesdroppers: Option<u8>,

    /// Flat key/value config file with overrides
    #[arg(long = "yaml", alias = "config")]
    yaml: Option<PathBuf>,

    /// Use the cooperative (coroutine) backend
    #[arg(long = "coro")]
    coro: bool,
}

impl Args {
    /// Apply explicitly given CLI options on top of `cfg`. CLI wins over
    /// the config file.
    fn apply(&self, cfg: &mut GameConfig) {
        if let Some(n) = self.n_players {
            cfg.n_players = n;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(human) = self.human {
            cfg.human = human;
        }
        if let Some(log) = &self.log {
            cfg.log_mode = if log == "full" { LogMode::Full } else { LogMode::Short };
        }
        if self.open {
            cfg.open_announcements = true;
        }
        if let Some(dir) = &self.logs_dir {
            cfg.logs_dir = dir.clone();
        }
        if let Some(tie) = &self.tie {
            cfg.tie_policy = if tie == "random" { TiePolicy::Random } else { TiePolicy::None };
        }
        if let Some(k) = self.k_mafia_div {
            cfg.k_mafia_divisor = k;
        }
        if let Some(v) = self.executioners {
            cfg.executioner_count = v as usize;
        }
        if let Some(v) = self.journalists {
            cfg.journalist_count = v as usize;
        }
        if let Some(v) = self.eavesdroppers {
            cfg.eavesdropper_count = v as usize;
        }
        if self.coro {
            cfg.backend = Backend::Coroutines;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mafia_sim=info")),
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    let mut cfg = GameConfig::default();
    if let Some(path) = &args.yaml {
        if let Err(e) = load_config_file(path, &mut cfg) {
            tracing::error!("{e}");
            return ExitCode::from(1);
        }
    }
    args.apply(&mut cfg);
    cfg.finalize();

    tracing::info!("mafia-sim: initializing");

    // A panic escaping the engine (an invariant break, or a poisoned lock
    // downstream of one) must exit with code 2 like any other runtime
    // failure, not with the default panic status.
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run_match(cfg)));
    match outcome {
        Ok(Ok(())) => {
            tracing::info!("mafia-sim: finished");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!("Fatal: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "engine panicked".to_string());
            tracing::error!("Fatal: {msg}");
            ExitCode::from(2)
        }
    }
}
