//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::CentralConfig;

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from subdirectory)
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the central configuration.
///
/// Uses the first config.toml found in this order:
/// 1. Path specified by the HEXRAVE_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// With no file found, the built-in defaults are used. A file that exists
/// but cannot be read or parsed is an error. Environment variable overrides
/// are applied last.
pub fn load_config() -> Result<CentralConfig, ConfigError> {
    if let Ok(path) = std::env::var("HEXRAVE_CONFIG") {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from HEXRAVE_CONFIG: {}", path.display());
            return load_from_path(&path);
        }
        warn!(
            "HEXRAVE_CONFIG={} not found, searching defaults",
            path.display()
        );
    }

    match CONFIG_SEARCH_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_from_path(path)
        }
        None => {
            debug!("No config.toml found, using built-in defaults");
            Ok(apply_env_overrides(CentralConfig::default()))
        }
    }
}

/// Load configuration from a specific path, then apply env overrides.
///
/// Sections and keys missing from the file take their built-in defaults.
pub fn load_from_path(path: &Path) -> Result<CentralConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(apply_env_overrides(config))
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (usize, u32, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // Optional string field
    ($config:expr, $section:ident . $field:ident, $key:expr, optional) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = Some(v);
        }
    };
    // Optional parseable field (Option<u32>, Option<u64>, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
    // Comma-separated list field
    ($config:expr, $section:ident . $field:ident, $key:expr, list) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: HEXRAVE_<SECTION>_<KEY>.
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "HEXRAVE_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.time_limit_secs,
        "HEXRAVE_MCTS_TIME_LIMIT_SECS",
        parse
    );
    env_override!(
        config,
        mcts.rave_constant,
        "HEXRAVE_MCTS_RAVE_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.exploration_constant,
        "HEXRAVE_MCTS_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(
        config,
        mcts.max_iterations,
        "HEXRAVE_MCTS_MAX_ITERATIONS",
        optional_parse
    );
    env_override!(
        config,
        mcts.max_rollout_plies,
        "HEXRAVE_MCTS_MAX_ROLLOUT_PLIES",
        optional_parse
    );
    env_override!(config, mcts.seed, "HEXRAVE_MCTS_SEED", optional_parse);

    // Arena
    env_override!(
        config,
        arena.board_size,
        "HEXRAVE_ARENA_BOARD_SIZE",
        parse
    );
    env_override!(config, arena.games, "HEXRAVE_ARENA_GAMES", parse);
    env_override!(config, arena.agents, "HEXRAVE_ARENA_AGENTS", list);
    env_override!(
        config,
        arena.summary_path,
        "HEXRAVE_ARENA_SUMMARY_PATH",
        optional
    );

    config
}
