//! MCTS configuration parameters.

use std::time::Duration;

use crate::search::SearchError;

/// Configuration for Monte Carlo Tree Search with RAVE.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget per move. Checked between iterations, so a search
    /// can overshoot by up to one iteration.
    pub time_limit: Duration,

    /// RAVE equivalence parameter `k` in `beta = sqrt(k / (3n + k))`.
    /// 0 disables RAVE (plain UCT); larger values trust RAVE for longer.
    /// Typical range: low hundreds to low thousands depending on board size.
    pub rave_constant: f64,

    /// Exploration constant for the UCT term (typically sqrt(2)).
    pub exploration_constant: f64,

    /// Optional hard cap on completed iterations, applied together with
    /// `time_limit` (whichever is reached first stops the search).
    pub max_iterations: Option<u32>,

    /// Optional ply cap per rollout. A rollout that reaches the cap without
    /// a result is scored as a draw.
    pub max_rollout_plies: Option<u32>,

    /// Seed for the search RNG. `None` seeds from system entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(2),
            rave_constant: 300.0,
            exploration_constant: std::f64::consts::SQRT_2,
            max_iterations: None,
            max_rollout_plies: None,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, deterministic config for testing.
    ///
    /// The iteration cap is what ends the search; the time limit is only a
    /// safety net.
    pub fn for_testing() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            max_iterations: Some(200),
            seed: Some(42),
            ..Self::default()
        }
    }

    /// Builder pattern: set the per-move time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Builder pattern: set the RAVE constant.
    pub fn with_rave_constant(mut self, k: f64) -> Self {
        self.rave_constant = k;
        self
    }

    /// Builder pattern: set the UCT exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: cap the number of iterations.
    pub fn with_max_iterations(mut self, n: u32) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Builder pattern: cap rollout length.
    pub fn with_max_rollout_plies(mut self, plies: u32) -> Self {
        self.max_rollout_plies = Some(plies);
        self
    }

    /// Builder pattern: fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject constants the scoring formula cannot handle.
    ///
    /// `rave_constant` may be `+inf` (pure RAVE weighting) but not negative
    /// or NaN.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.rave_constant.is_nan() || self.rave_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "rave_constant must be non-negative, got {}",
                self.rave_constant
            )));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration_constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }

        Ok(())
    }
}
