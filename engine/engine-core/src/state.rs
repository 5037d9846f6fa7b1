//! The `GameState` trait consumed by the search engine.
//!
//! The engine treats a state as a value: it clones before every mutation, so
//! implementations are free to mutate in place inside `apply_move`.

use std::fmt::Debug;
use std::hash::Hash;

use crate::outcome::Outcome;
use crate::player::Player;

/// Errors raised by game implementations when a move cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    #[error("Position ({row}, {col}) is outside a board of size {size}")]
    OutOfBounds { row: usize, col: usize, size: usize },
    #[error("Game is already over")]
    GameOver,
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}

/// Board abstraction for two-player, perfect-information games.
///
/// # Example
///
/// ```rust
/// # use engine_core::{GameError, GameState, Player};
/// /// Players alternately take a stone; whoever takes the last one wins.
/// #[derive(Debug, Clone)]
/// struct LastStone {
///     stones: u8,
///     last_mover: Option<Player>,
/// }
///
/// impl GameState for LastStone {
///     type Move = u8;
///
///     fn legal_moves(&self) -> Vec<u8> {
///         if self.stones == 0 { Vec::new() } else { vec![1] }
///     }
///     fn apply_move(&mut self, _mv: u8, player: Player) -> Result<(), GameError> {
///         if self.stones == 0 {
///             return Err(GameError::GameOver);
///         }
///         self.stones -= 1;
///         self.last_mover = Some(player);
///         Ok(())
///     }
///     fn is_terminal(&self) -> bool { self.stones == 0 }
///     fn winner(&self) -> Option<Player> {
///         if self.stones == 0 { self.last_mover } else { None }
///     }
///     fn action_space(&self) -> usize { 2 }
///     fn move_index(&self, mv: u8) -> usize { mv as usize }
/// }
///
/// let mut game = LastStone { stones: 1, last_mover: None };
/// game.apply_move(1, Player::Two).unwrap();
/// assert_eq!(game.winner(), Some(Player::Two));
/// ```
pub trait GameState: Clone + Debug {
    /// Opaque identifier of a move (a board cell in Hex).
    type Move: Copy + Eq + Hash + Debug;

    /// All moves available in this position. Empty once the game is over.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Play `mv` for `player`.
    fn apply_move(&mut self, mv: Self::Move, player: Player) -> Result<(), GameError>;

    /// Whether the game has ended (a winner exists or no moves remain).
    fn is_terminal(&self) -> bool;

    /// The winner, if the game has been decided.
    fn winner(&self) -> Option<Player>;

    /// Upper bound (exclusive) of [`GameState::move_index`].
    fn action_space(&self) -> usize;

    /// Dense index of `mv` in `0..action_space()`.
    ///
    /// Lets per-move statistics live in flat arrays instead of hash maps.
    fn move_index(&self, mv: Self::Move) -> usize;

    /// Outcome of a finished game, `None` while the game is in progress.
    ///
    /// A terminal state without a winner is a draw.
    fn outcome(&self) -> Option<Outcome> {
        if !self.is_terminal() {
            return None;
        }
        Some(match self.winner() {
            Some(player) => Outcome::Win(player),
            None => Outcome::Draw,
        })
    }
}
