//! Command-line configuration for the arena
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use engine_config::{duration_from_secs, load_config, CentralConfig};
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;

use crate::agent::AgentKind;

static CENTRAL_CONFIG: OnceCell<CentralConfig> = OnceCell::new();

/// Load config.toml and env overrides. Must run before the CLI is parsed,
/// since argument defaults come from it.
pub fn init_central_config() -> Result<()> {
    let config = load_config()?;
    CENTRAL_CONFIG
        .set(config)
        .map_err(|_| anyhow!("central config already loaded"))
}

// Built-in defaults when nothing was loaded (unit tests)
fn central() -> &'static CentralConfig {
    CENTRAL_CONFIG.get_or_init(CentralConfig::default)
}

// Default value functions that read from central config
fn default_log_level() -> String {
    central().common.log_level.clone()
}

fn default_board_size() -> usize {
    central().arena.board_size
}

fn default_agent(seat: usize) -> String {
    central()
        .arena
        .agents
        .get(seat)
        .cloned()
        .unwrap_or_else(|| AgentKind::Rave.to_string())
}

fn default_time_limit() -> f64 {
    central().mcts.time_limit_secs
}

fn default_rave_constant() -> f64 {
    central().mcts.rave_constant
}

fn default_exploration_constant() -> f64 {
    central().mcts.exploration_constant
}

fn default_games() -> u32 {
    central().arena.games
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hex-arena")]
#[command(about = "Play Hex between MCTS-RAVE, UCT, flat Monte Carlo and random agents")]
#[command(
    long_about = "Runs single Hex games or tournaments between two agents.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Play one game, printing the board after every move
    Play {
        /// Colour that moves first (1 or 2)
        #[arg(long, default_value_t = 1)]
        first: u8,
    },

    /// Play a series of games; the second half starts with player 2
    Tournament {
        /// Number of games
        #[arg(long, default_value_t = default_games())]
        games: u32,

        /// Write the summary as JSON to this path
        #[arg(long)]
        summary_path: Option<String>,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Board side length
    #[arg(long, global = true, default_value_t = default_board_size())]
    pub board_size: usize,

    /// Agent playing player 1 (top to bottom): rave, uct, mcs or random
    #[arg(long, global = true, default_value_t = default_agent(0))]
    pub player_one: String,

    /// Agent playing player 2 (left to right): rave, uct, mcs or random
    #[arg(long, global = true, default_value_t = default_agent(1))]
    pub player_two: String,

    /// Thinking time per move in seconds
    #[arg(long, global = true, default_value_t = default_time_limit())]
    pub time_limit_secs: f64,

    /// RAVE constant k for rave agents (0 disables RAVE)
    #[arg(long, global = true, default_value_t = default_rave_constant())]
    pub rave_constant: f64,

    /// UCT exploration constant
    #[arg(long, global = true, default_value_t = default_exploration_constant())]
    pub exploration_constant: f64,

    /// Stop each search after this many iterations
    #[arg(long, global = true)]
    pub max_iterations: Option<u32>,

    /// Score rollouts longer than this as draws
    #[arg(long, global = true)]
    pub max_rollout_plies: Option<u32>,

    /// RNG seed for reproducible games
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        match &self.command {
            Command::Play { first } => {
                if !matches!(*first, 1 | 2) {
                    return Err(anyhow!("first must be 1 or 2, got {first}"));
                }
            }
            Command::Tournament { games, .. } => {
                if *games == 0 {
                    return Err(anyhow!("games must be greater than 0"));
                }
            }
        }

        Ok(())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 || self.board_size > games_hex::MAX_SIZE {
            return Err(anyhow!(
                "board_size must be between 1 and {}, got {}",
                games_hex::MAX_SIZE,
                self.board_size
            ));
        }

        self.agents()?;
        self.mcts_config()?.validate()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    /// Agent kinds for the player 1 and player 2 seats.
    pub fn agents(&self) -> Result<[AgentKind; 2]> {
        Ok([self.player_one.parse()?, self.player_two.parse()?])
    }

    pub fn time_limit(&self) -> Result<Duration> {
        duration_from_secs(self.time_limit_secs).ok_or_else(|| {
            anyhow!(
                "time_limit_secs must be a non-negative number of seconds, got {}",
                self.time_limit_secs
            )
        })
    }

    /// Search configuration, with unset optional values taken from config.toml.
    pub fn mcts_config(&self) -> Result<mcts::MctsConfig> {
        let file = &central().mcts;
        Ok(mcts::MctsConfig {
            time_limit: self.time_limit()?,
            rave_constant: self.rave_constant,
            exploration_constant: self.exploration_constant,
            max_iterations: self.max_iterations.or(file.max_iterations),
            max_rollout_plies: self.max_rollout_plies.or(file.max_rollout_plies),
            seed: self.seed.or(file.seed),
        })
    }

    /// Search configuration for one seat. Seeded searches get distinct
    /// per-seat seeds so two identical agents do not mirror each other.
    pub fn mcts_config_for_seat(&self, seat: usize) -> Result<mcts::MctsConfig> {
        let mut config = self.mcts_config()?;
        config.seed = config.seed.map(|seed| seed.wrapping_add(seat as u64));
        Ok(config)
    }
}

/// Summary path from the CLI, falling back to config.toml.
pub fn summary_path(cli_value: Option<&str>) -> Option<String> {
    cli_value
        .map(str::to_string)
        .or_else(|| central().arena.summary_path.clone())
}
