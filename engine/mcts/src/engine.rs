//! Reusable move selector that owns its configuration and RNG.

use engine_core::{GameState, Player};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::MctsConfig;
use crate::search::{run_mcts, SearchError, SearchResult};

/// Runs one fresh search per call. Nothing is kept between moves.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl SearchEngine {
    /// Seeds from `config.seed`, or system entropy when unset.
    pub fn new(config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search `state` for `acting` and return the full result.
    pub fn search<G: GameState>(
        &mut self,
        state: &G,
        acting: Player,
    ) -> Result<SearchResult<G::Move>, SearchError> {
        run_mcts(state, acting, &self.config, &mut self.rng)
    }

    /// Search `state` for `acting` and return only the chosen move.
    pub fn select_move<G: GameState>(
        &mut self,
        state: &G,
        acting: Player,
    ) -> Result<G::Move, SearchError> {
        self.search(state, acting).map(|result| result.best_move)
    }
}
