//! Monte Carlo Tree Search with RAVE for two-player connection games.
//!
//! This crate picks a move for any game implementing the `engine-core`
//! [`GameState`](engine_core::GameState) trait. It was built for Hex but
//! assumes nothing beyond alternating turns and a dense move index.
//!
//! # Overview
//!
//! Each iteration of the search runs four phases:
//!
//! 1. **Selection**: From the root, repeatedly pick the child with the best
//!    UCT-RAVE score while the current node is fully expanded
//! 2. **Expansion**: Add one child for a random untried move
//! 3. **Rollout**: Play the new node out with random legal moves
//! 4. **Backpropagation**: Update visits and wins on the path to the root,
//!    and record every rollout move in the RAVE tables along the way
//!
//! RAVE (rapid action value estimation) lets a node learn about a move from
//! every rollout in which its player played that move at any later point,
//! not just from the child for that move. The estimate is blended in with a
//! weight that fades as the child collects real visits (see [`rave_beta`]).
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use engine_core::Player;
//! use games_hex::HexBoard;
//! use mcts::{run_mcts, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = HexBoard::new(5).unwrap();
//! let config = MctsConfig::default()
//!     .with_time_limit(Duration::from_secs(1))
//!     .with_max_iterations(500)
//!     .with_rave_constant(300.0);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let result = run_mcts(&board, Player::One, &config, &mut rng).unwrap();
//!
//! println!("Best move: {}", result.best_move);
//! println!("Iterations: {}", result.iterations);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `time_limit`: Wall-clock budget per move (default: 2s)
//! - `rave_constant`: RAVE equivalence parameter `k` (default: 300, 0 = plain UCT)
//! - `exploration_constant`: UCT exploration weight (default: sqrt(2))
//! - `max_iterations`: Optional iteration cap, for reproducible searches
//! - `max_rollout_plies`: Optional rollout length cap; capped rollouts are draws
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                         MctsSearch                          |
//! +-------------------------------------------------------------+
//! |  +-------------+  +---------------+  +-------------------+  |
//! |  | SearchTree  |  | RolloutPolicy |  |  StopCondition    |  |
//! |  |  (arena)    |  |  (playouts)   |  | (time/iterations) |  |
//! |  +------+------+  +-------+-------+  +---------+---------+  |
//! |         |                 |                    |            |
//! |         v                 v                    v            |
//! |  +-------------------------------------------------------+  |
//! |  |         select -> expand -> rollout ->                |  |
//! |  |                  backpropagate (+ RAVE)               |  |
//! |  +-------------------------------------------------------+  |
//! +-------------------------------------------------------------+
//! ```

pub mod budget;
pub mod config;
pub mod engine;
pub mod node;
pub mod rave;
pub mod rollout;
pub mod score;
pub mod search;
pub mod tree;

// Re-export main types
pub use budget::{IterationBudget, SearchBudget, StopCondition, TimeBudget};
pub use config::MctsConfig;
pub use engine::SearchEngine;
pub use node::{NodeId, SearchNode};
pub use rave::{RaveStats, RaveTable};
pub use rollout::{playout, Playout, RolloutPolicy, UniformRollout};
pub use score::{rave_beta, uct_rave_score, uct_score};
pub use search::{run_mcts, select_move, MctsSearch, SearchError, SearchResult};
pub use tree::{MoveStats, SearchTree, TreeStats};
