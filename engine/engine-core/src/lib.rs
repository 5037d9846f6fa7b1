//! Core traits and types for the Hex search engine
//!
//! This crate provides the contract the search core consumes:
//! - `GameState`: cloneable board abstraction (legal moves, apply, terminal test, winner)
//! - `Player`: the two sides of a two-player game
//! - `Outcome`: result of a finished game, including the draw credit rule
//!
//! Games implement `GameState`; the `mcts` crate never looks inside a move
//! or a board beyond these operations.

pub mod outcome;
pub mod player;
pub mod state;

// Re-export main types for convenience
pub use outcome::Outcome;
pub use player::Player;
pub use state::{GameError, GameState};
