//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use std::time::Duration;

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_time_limit_secs() -> f64 {
    defaults::time_limit_secs()
}
fn d_rave_constant() -> f64 {
    defaults::rave_constant()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_max_iterations() -> Option<u32> {
    defaults::max_iterations()
}
fn d_max_rollout_plies() -> Option<u32> {
    defaults::max_rollout_plies()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}
fn d_board_size() -> usize {
    defaults::board_size()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_agents() -> Vec<String> {
    defaults::agents().to_vec()
}
fn d_summary_path() -> Option<String> {
    defaults::summary_path().map(Into::into)
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_time_limit_secs")]
    pub time_limit_secs: f64,
    #[serde(default = "d_rave_constant")]
    pub rave_constant: f64,
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
    #[serde(default = "d_max_iterations")]
    pub max_iterations: Option<u32>,
    #[serde(default = "d_max_rollout_plies")]
    pub max_rollout_plies: Option<u32>,
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: defaults::time_limit_secs(),
            rave_constant: defaults::rave_constant(),
            exploration_constant: defaults::exploration_constant(),
            max_iterations: defaults::max_iterations(),
            max_rollout_plies: defaults::max_rollout_plies(),
            seed: defaults::seed(),
        }
    }
}

/// Convert a seconds value from config or CLI into a `Duration`.
///
/// Returns `None` for negative, NaN or infinite values, and for values too
/// large to represent.
pub fn duration_from_secs(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

/// Match and tournament settings for the arena binary
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    #[serde(default = "d_board_size")]
    pub board_size: usize,
    #[serde(default = "d_games")]
    pub games: u32,
    /// Agent kinds for the first and second seat
    #[serde(default = "d_agents")]
    pub agents: Vec<String>,
    #[serde(default = "d_summary_path")]
    pub summary_path: Option<String>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            games: defaults::games(),
            agents: defaults::agents().to_vec(),
            summary_path: defaults::summary_path().map(Into::into),
        }
    }
}
