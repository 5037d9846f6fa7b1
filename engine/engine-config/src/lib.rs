//! Centralized configuration loading from config.toml.
//!
//! This crate provides configuration structs and loading logic shared
//! by the search engine and the arena binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`HEXRAVE_<SECTION>_<KEY>`)
//! 3. config.toml file
//! 4. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! HEXRAVE_<SECTION>_<KEY>=value
//!
//! Examples:
//!     HEXRAVE_COMMON_LOG_LEVEL=debug
//!     HEXRAVE_MCTS_TIME_LIMIT_SECS=0.5
//!     HEXRAVE_MCTS_RAVE_CONSTANT=1000
//!     HEXRAVE_ARENA_BOARD_SIZE=11
//!     HEXRAVE_ARENA_AGENTS=rave,uct
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, ConfigError, CONFIG_SEARCH_PATHS};
pub use structs::*;
