//! Move selection agents for the arena

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use engine_core::{GameState, Player};
use games_hex::{HexBoard, HexMove};
use mcts::{playout, MctsConfig, SearchBudget, SearchEngine, StopCondition, UniformRollout};
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;
use tracing::debug;

/// Something that can pick a move on a Hex board.
pub trait Agent {
    /// Short name for logs and tables
    fn name(&self) -> &str;

    /// Choose a legal move for `player`
    fn select_move(&mut self, board: &HexBoard, player: Player) -> Result<HexMove>;
}

/// Agent kinds selectable from config and CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// UCT search with RAVE
    Rave,
    /// Plain UCT search (RAVE disabled)
    Uct,
    /// Flat Monte Carlo: rollouts per root move, no tree
    Mcs,
    Random,
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rave" | "mcts" => Ok(Self::Rave),
            "uct" => Ok(Self::Uct),
            "mcs" | "flat" => Ok(Self::Mcs),
            "random" => Ok(Self::Random),
            other => Err(anyhow!(
                "unknown agent '{other}', expected one of rave, uct, mcs, random"
            )),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rave => write!(f, "rave"),
            Self::Uct => write!(f, "uct"),
            Self::Mcs => write!(f, "mcs"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl AgentKind {
    /// Build an agent of this kind. `config.seed` seeds its RNG when set.
    pub fn build(self, config: &MctsConfig) -> Result<Box<dyn Agent>> {
        Ok(match self {
            Self::Rave => Box::new(SearchAgent::rave(config.clone())?),
            Self::Uct => Box::new(SearchAgent::uct(config.clone())?),
            Self::Mcs => Box::new(FlatMonteCarloAgent::new(config.clone())?),
            Self::Random => match config.seed {
                Some(seed) => Box::new(RandomAgent::with_seed(seed)),
                None => Box::new(RandomAgent::new()),
            },
        })
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

/// Tree search agent, with or without RAVE.
#[derive(Debug)]
pub struct SearchAgent {
    name: &'static str,
    engine: SearchEngine,
}

impl SearchAgent {
    /// UCT-RAVE with the configured RAVE constant.
    pub fn rave(config: MctsConfig) -> Result<Self> {
        Ok(Self {
            name: "rave",
            engine: SearchEngine::new(config)?,
        })
    }

    /// Plain UCT. Overrides the RAVE constant with 0 so the RAVE term
    /// never contributes, whatever the shared settings say.
    pub fn uct(config: MctsConfig) -> Result<Self> {
        Ok(Self {
            name: "uct",
            engine: SearchEngine::new(config.with_rave_constant(0.0))?,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        self.engine.config()
    }
}

impl Agent for SearchAgent {
    fn name(&self) -> &str {
        self.name
    }

    fn select_move(&mut self, board: &HexBoard, player: Player) -> Result<HexMove> {
        let result = self.engine.search(board, player)?;
        debug!(
            agent = self.name,
            %player,
            best_move = %result.best_move,
            iterations = result.iterations,
            iterations_per_sec = result.iterations_per_sec() as u64,
            tree_size = result.tree_size,
            "Search agent selected move"
        );
        Ok(result.best_move)
    }
}

/// Flat Monte Carlo agent.
///
/// Cycles through the legal moves, playing each once and finishing the
/// game with a uniform rollout, until the search budget runs out. Picks
/// the move with the best win rate; ties go to the earlier move.
#[derive(Debug)]
pub struct FlatMonteCarloAgent {
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl FlatMonteCarloAgent {
    pub fn new(config: MctsConfig) -> Result<Self> {
        config.validate()?;
        let rng = seeded_rng(config.seed);
        Ok(Self { config, rng })
    }
}

impl Agent for FlatMonteCarloAgent {
    fn name(&self) -> &str {
        "mcs"
    }

    fn select_move(&mut self, board: &HexBoard, player: Player) -> Result<HexMove> {
        let moves = board.legal_moves();
        let mut best = *moves
            .first()
            .ok_or_else(|| anyhow!("no legal moves on a finished board"))?;

        let mut visits = vec![0u32; moves.len()];
        let mut wins = vec![0.0f64; moves.len()];
        let mut budget = SearchBudget::from_config(&self.config);
        let mut completed = 0u32;

        while !budget.should_stop(completed) {
            let i = completed as usize % moves.len();
            let mut state = board.clone();
            state.apply_move(moves[i], player)?;
            let result = playout(
                state,
                player.opponent(),
                &mut UniformRollout,
                self.config.max_rollout_plies,
                &mut self.rng,
            )?;
            visits[i] += 1;
            wins[i] += result.outcome.credit_for(player);
            completed += 1;
        }

        // Unsampled moves rate 0
        let mut best_rate = f64::NEG_INFINITY;
        for ((&mv, &n), &w) in moves.iter().zip(&visits).zip(&wins) {
            let rate = if n == 0 { 0.0 } else { w / n as f64 };
            if rate > best_rate {
                best_rate = rate;
                best = mv;
            }
        }

        debug!(
            %player,
            best_move = %best,
            win_rate = best_rate,
            simulations = completed,
            "Flat Monte Carlo agent selected move"
        );
        Ok(best)
    }
}

/// Agent that plays uniformly random legal moves.
#[derive(Debug)]
pub struct RandomAgent {
    rng: ChaCha20Rng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: seeded_rng(None),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: seeded_rng(Some(seed)),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&mut self, board: &HexBoard, _player: Player) -> Result<HexMove> {
        board
            .legal_moves()
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow!("no legal moves on a finished board"))
    }
}
