//! Default configuration values loaded from config.defaults.toml.
//!
//! The defaults file is embedded at compile time so the binary never
//! depends on it being present at runtime.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    arena: ArenaDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    time_limit_secs: f64,
    rave_constant: f64,
    exploration_constant: f64,
    max_iterations: Option<u32>,
    max_rollout_plies: Option<u32>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ArenaDefaults {
    board_size: usize,
    games: u32,
    agents: Vec<String>,
    summary_path: Option<String>,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn time_limit_secs() -> f64 {
    DEFAULTS.mcts.time_limit_secs
}
pub fn rave_constant() -> f64 {
    DEFAULTS.mcts.rave_constant
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn max_iterations() -> Option<u32> {
    DEFAULTS.mcts.max_iterations
}
pub fn max_rollout_plies() -> Option<u32> {
    DEFAULTS.mcts.max_rollout_plies
}
pub fn seed() -> Option<u64> {
    DEFAULTS.mcts.seed
}

// Arena
pub fn board_size() -> usize {
    DEFAULTS.arena.board_size
}
pub fn games() -> u32 {
    DEFAULTS.arena.games
}
pub fn agents() -> &'static [String] {
    &DEFAULTS.arena.agents
}
pub fn summary_path() -> Option<&'static str> {
    DEFAULTS.arena.summary_path.as_deref()
}
