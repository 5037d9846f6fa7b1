//! MCTS search implementation.
//!
//! Each iteration runs the four classic phases:
//! 1. Selection: descend from the root by UCT-RAVE score while the current
//!    node is fully expanded and non-terminal
//! 2. Expansion: turn one random untried move of that node into a child
//! 3. Rollout: play the new node's state out with the rollout policy
//! 4. Backpropagation: update visits, wins and RAVE tables up to the root

use std::time::{Duration, Instant};

use engine_core::{GameError, GameState, Player};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::budget::{SearchBudget, StopCondition};
use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::rollout::{playout, RolloutPolicy, UniformRollout};
use crate::tree::{MoveStats, SearchTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Tree invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Most visited root move
    pub best_move: M,

    /// Number of completed iterations
    pub iterations: u32,

    /// Visits of the root node
    pub root_visits: u32,

    /// Wall-clock time spent searching
    pub elapsed: Duration,

    /// Number of nodes in the tree when the search stopped
    pub tree_size: usize,

    /// Statistics for every expanded root move
    pub children: Vec<MoveStats<M>>,
}

impl<M> SearchResult<M> {
    /// Iterations per second.
    pub fn iterations_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }
}

/// MCTS search state.
pub struct MctsSearch<G: GameState, P: RolloutPolicy<G> = UniformRollout> {
    tree: SearchTree<G>,
    config: MctsConfig,
    policy: P,
    acting: Player,
}

impl<G: GameState> MctsSearch<G, UniformRollout> {
    /// Create a new search from `state` for `acting`, with uniform rollouts.
    pub fn new(state: &G, acting: Player, config: MctsConfig) -> Result<Self, SearchError> {
        Self::with_policy(state, acting, config, UniformRollout)
    }
}

impl<G: GameState, P: RolloutPolicy<G>> MctsSearch<G, P> {
    /// Create a new search with a custom rollout policy.
    ///
    /// Fails without building a tree when `state` is terminal or has no
    /// legal moves.
    pub fn with_policy(
        state: &G,
        acting: Player,
        config: MctsConfig,
        policy: P,
    ) -> Result<Self, SearchError> {
        config.validate()?;

        if state.is_terminal() || state.legal_moves().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        Ok(Self {
            tree: SearchTree::new(state.clone(), acting),
            config,
            policy,
            acting,
        })
    }

    /// Run iterations until `stop` says otherwise, then report the most
    /// visited root move.
    ///
    /// If no iteration completed, falls back to the most visited child if
    /// any, else the root's first untried move.
    pub fn run<S: StopCondition, R: Rng>(
        &mut self,
        stop: &mut S,
        rng: &mut R,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        let start = Instant::now();
        let mut iterations = 0u32;

        while !stop.should_stop(iterations) {
            self.run_iteration(rng)?;
            iterations += 1;
        }

        let root = self.tree.get(self.tree.root());
        let best_move = match self.tree.best_move() {
            Some((mv, _)) => mv,
            None => root
                .untried_moves
                .first()
                .copied()
                .ok_or(SearchError::NoLegalMoves)?,
        };

        let elapsed = start.elapsed();
        debug!(
            acting = %self.acting,
            iterations,
            nodes = self.tree.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            best_move = ?best_move,
            "MCTS search complete"
        );

        Ok(SearchResult {
            best_move,
            iterations,
            root_visits: root.visits,
            elapsed,
            tree_size: self.tree.len(),
            children: self.tree.root_move_stats(),
        })
    }

    /// Run a single iteration (select -> expand -> rollout -> backpropagate).
    pub fn run_iteration<R: Rng>(&mut self, rng: &mut R) -> Result<(), SearchError> {
        let selected = self.select();
        let leaf_id = self.expand(selected, rng)?;

        let leaf = self.tree.get(leaf_id);
        let result = playout(
            leaf.state.clone(),
            leaf.player_to_move(),
            &mut self.policy,
            self.config.max_rollout_plies,
            rng,
        )?;

        self.tree.backpropagate(leaf_id, &result);

        trace!(
            leaf = leaf_id.0,
            rollout_plies = result.moves.len(),
            outcome = ?result.outcome,
            "MCTS iteration complete"
        );

        Ok(())
    }

    /// Descend from the root while the node is fully expanded, non-terminal
    /// and has children.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.is_fully_expanded() {
                break;
            }

            match self.tree.select_child(
                current,
                self.config.rave_constant,
                self.config.exploration_constant,
            ) {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        current
    }

    /// Expand one random untried move of `node_id`. Returns the new child,
    /// or `node_id` itself when it has nothing left to expand.
    fn expand<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) -> Result<NodeId, SearchError> {
        let node = self.tree.get_mut(node_id);
        if node.is_terminal || node.untried_moves.is_empty() {
            return Ok(node_id);
        }

        let pick = rng.gen_range(0..node.untried_moves.len());
        let mv = node.untried_moves.swap_remove(pick);
        let mover = node.player_to_move();

        let mut state = node.state.clone();
        state.apply_move(mv, mover)?;

        self.tree.add_child(node_id, mv, mover, state)
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree<G> {
        &self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

/// Convenience function to run a single search under `config`'s budget.
pub fn run_mcts<G: GameState, R: Rng>(
    state: &G,
    acting: Player,
    config: &MctsConfig,
    rng: &mut R,
) -> Result<SearchResult<G::Move>, SearchError> {
    let mut budget = SearchBudget::from_config(config);
    let mut search = MctsSearch::new(state, acting, config.clone())?;
    search.run(&mut budget, rng)
}

/// Pick a move for `acting` within `time_limit`, using default values for
/// everything but the RAVE constant.
pub fn select_move<G: GameState, R: Rng>(
    state: &G,
    acting: Player,
    time_limit: Duration,
    rave_constant: f64,
    rng: &mut R,
) -> Result<G::Move, SearchError> {
    let config = MctsConfig::default()
        .with_time_limit(time_limit)
        .with_rave_constant(rave_constant);
    run_mcts(state, acting, &config, rng).map(|result| result.best_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{IterationBudget, TimeBudget};
    use engine_core::Outcome;
    use games_hex::{HexBoard, HexMove};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    /// Fill all cells; every finished game is a draw.
    #[derive(Debug, Clone)]
    struct Fill {
        cells: Vec<bool>,
    }

    impl GameState for Fill {
        type Move = usize;

        fn legal_moves(&self) -> Vec<usize> {
            (0..self.cells.len()).filter(|&i| !self.cells[i]).collect()
        }

        fn apply_move(&mut self, mv: usize, _player: Player) -> Result<(), GameError> {
            if self.cells[mv] {
                return Err(GameError::IllegalMove(format!("cell {mv} is full")));
            }
            self.cells[mv] = true;
            Ok(())
        }

        fn is_terminal(&self) -> bool {
            self.cells.iter().all(|&c| c)
        }

        fn winner(&self) -> Option<Player> {
            None
        }

        fn action_space(&self) -> usize {
            self.cells.len()
        }

        fn move_index(&self, mv: usize) -> usize {
            mv
        }
    }

    fn search_hex(board: &HexBoard, acting: Player, iterations: u32, seed: u64) -> MctsSearch<HexBoard> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut search = MctsSearch::new(board, acting, MctsConfig::for_testing()).unwrap();
        search.run(&mut IterationBudget::new(iterations), &mut rng).unwrap();
        search
    }

    #[test]
    fn test_terminal_state_has_no_moves() {
        let board = HexBoard::from_rows(&[". X .", ". X .", ". X ."]).unwrap();
        let result = MctsSearch::new(&board, Player::Two, MctsConfig::for_testing());
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let result = select_move(&board, Player::Two, Duration::from_millis(10), 300.0, &mut rng);
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn test_select_move_within_time_limit() {
        let board = HexBoard::new(5).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let limit = Duration::from_millis(100);

        let start = Instant::now();
        let mv = select_move(&board, Player::One, limit, 300.0, &mut rng).unwrap();

        assert!(start.elapsed() >= limit);
        assert!(board.legal_moves().contains(&mv));
    }

    #[test]
    fn test_time_budget_search_completes() {
        let board = HexBoard::new(5).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(23);
        let config = MctsConfig::default().with_time_limit(Duration::from_millis(100));
        assert_eq!(config.max_iterations, None);

        let result = run_mcts(&board, Player::Two, &config, &mut rng).unwrap();

        assert!(board.legal_moves().contains(&result.best_move));
        assert!(result.iterations > 0);
        assert_eq!(result.root_visits, result.iterations);
        assert!(result.elapsed >= config.time_limit);
        let visits: u32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(visits, result.iterations);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let board = HexBoard::new(3).unwrap();
        let config = MctsConfig::for_testing().with_rave_constant(-5.0);
        assert!(matches!(
            MctsSearch::new(&board, Player::One, config),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basic_search() {
        let board = HexBoard::new(4).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let result = run_mcts(&board, Player::One, &MctsConfig::for_testing(), &mut rng).unwrap();

        assert!(board.legal_moves().contains(&result.best_move));
        assert_eq!(result.iterations, 200);
        assert_eq!(result.root_visits, 200);
        assert!(result.tree_size > 1);
        assert_eq!(result.children.len(), 16);

        let visits: u32 = result.children.iter().map(|c| c.visits).sum();
        assert_eq!(visits, 200);
    }

    #[test]
    fn test_root_visits_equal_iterations() {
        let board = HexBoard::new(5).unwrap();
        let search = search_hex(&board, Player::Two, 300, 9);
        let root = search.tree().get(search.tree().root());

        assert_eq!(root.visits, 300);
        let child_visits: u32 = root
            .children
            .iter()
            .map(|(_, id)| search.tree().get(*id).visits)
            .sum();
        assert_eq!(child_visits, 300);
        search.tree().check_invariants().unwrap();
    }

    #[test]
    fn test_each_iteration_grows_tree_by_at_most_one() {
        let board = HexBoard::new(3).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut search = MctsSearch::new(&board, Player::One, MctsConfig::for_testing()).unwrap();

        for i in 0..400 {
            let before_nodes = search.tree().len();
            let before_visits = search.tree().get(search.tree().root()).visits;

            search.run_iteration(&mut rng).unwrap();

            let after_nodes = search.tree().len();
            assert!(after_nodes == before_nodes || after_nodes == before_nodes + 1);
            assert_eq!(search.tree().get(search.tree().root()).visits, before_visits + 1);
            assert_eq!(before_visits, i);
        }

        search.tree().check_invariants().unwrap();
        for node in search.tree().arena() {
            for &(_, child) in &node.children {
                assert!(search.tree().get(child).visits <= node.visits);
            }
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let board = HexBoard::new(4).unwrap();
        let a = search_hex(&board, Player::One, 250, 77);
        let b = search_hex(&board, Player::One, 250, 77);

        assert_eq!(a.tree().len(), b.tree().len());
        for (x, y) in a.tree().arena().iter().zip(b.tree().arena()) {
            assert_eq!(x.mv, y.mv);
            assert_eq!(x.visits, y.visits);
            assert!((x.wins - y.wins).abs() < 1e-12);
            assert_eq!(x.rave, y.rave);
        }
        assert_eq!(a.tree().best_move(), b.tree().best_move());
    }

    #[test]
    fn test_finds_immediate_win() {
        // One to move; b3 is the only winning move (a3 is blocked)
        let board = HexBoard::from_rows(&["O X .", ". X .", "O . ."]).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let config = MctsConfig::for_testing().with_max_iterations(2_000);
        let result = run_mcts(&board, Player::One, &config, &mut rng).unwrap();

        assert_eq!(result.best_move, HexMove::new(2, 1));
        let winning = result
            .children
            .iter()
            .find(|c| c.mv == HexMove::new(2, 1))
            .unwrap();
        assert!((winning.win_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_iterations_falls_back_to_untried_move() {
        let board = HexBoard::new(3).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let mut search = MctsSearch::new(&board, Player::One, MctsConfig::for_testing()).unwrap();

        let result = search.run(&mut IterationBudget::new(0), &mut rng).unwrap();
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best_move, board.legal_moves()[0]);
        assert_eq!(search.tree().len(), 1);

        let result = search.run(&mut TimeBudget::new(Duration::ZERO), &mut rng).unwrap();
        assert_eq!(result.iterations, 0);
        assert!(board.legal_moves().contains(&result.best_move));
    }

    #[test]
    fn test_draws_are_half_wins() {
        let game = Fill { cells: vec![false; 4] };
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut search = MctsSearch::new(&game, Player::One, MctsConfig::for_testing()).unwrap();
        search.run(&mut IterationBudget::new(100), &mut rng).unwrap();

        let tree = search.tree();
        for node in tree.arena() {
            assert!((node.wins - 0.5 * node.visits as f64).abs() < 1e-9);
            for (_, stats) in node.rave.iter() {
                assert!((stats.wins - 0.5 * stats.visits as f64).abs() < 1e-9);
            }
        }
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_rollout_cap_counts_as_draw() {
        let board = HexBoard::new(7).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let config = MctsConfig::for_testing().with_max_rollout_plies(0);
        let mut search = MctsSearch::new(&board, Player::One, config).unwrap();
        search.run(&mut IterationBudget::new(50), &mut rng).unwrap();

        // Nothing below depth 1 can be terminal on an empty 7x7 board
        let root = search.tree().get(search.tree().root());
        assert!((root.wins - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_rave_disabled_is_plain_uct() {
        let board = HexBoard::new(3).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let config = MctsConfig::for_testing().with_rave_constant(0.0);
        let mut search = MctsSearch::new(&board, Player::One, config).unwrap();
        search.run(&mut IterationBudget::new(100), &mut rng).unwrap();

        let tree = search.tree();
        let root = tree.get(tree.root());
        for &(_, id) in &root.children {
            let child = tree.get(id);
            let with_rave = crate::score::score(root, child, 0.0, 1.4);
            let plain = crate::score::uct_score(root.visits, child.visits, child.wins, 1.4);
            assert!((with_rave - plain).abs() < 1e-12);
        }
    }

    #[test]
    fn test_outcome_credit_matches_perspective() {
        // b3 completes One's column
        let board = HexBoard::from_rows(&[". X .", ". X .", ". . ."]).unwrap();
        let search = search_hex(&board, Player::One, 50, 2);
        let tree = search.tree();
        let root = tree.get(tree.root());

        let win = root.child_for(HexMove::new(2, 1)).unwrap();
        let child = tree.get(win);
        assert!(child.is_terminal);
        assert_eq!(child.state.outcome(), Some(Outcome::Win(Player::One)));
        assert!((child.win_rate() - 1.0).abs() < 1e-12);
    }
}
