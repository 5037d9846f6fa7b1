//! Rollout (playout) policies.
//!
//! A rollout plays a copy of a state to the end and reports the result along
//! with every move made, tagged with its mover, so backpropagation can feed
//! the RAVE tables.

use engine_core::{GameState, Outcome, Player};
use rand::Rng;
use tracing::trace;

use crate::search::SearchError;

/// Chooses moves during rollouts.
///
/// The search is generic over the policy, so a smarter rollout (e.g. one
/// that answers bridge intrusions) plugs in without touching the tree code.
pub trait RolloutPolicy<G: GameState> {
    /// Pick one of `legal_moves` (never empty) for `player` in `state`.
    fn choose_move<R: Rng>(
        &mut self,
        state: &G,
        player: Player,
        legal_moves: &[G::Move],
        rng: &mut R,
    ) -> G::Move;
}

/// Uniformly random legal moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl UniformRollout {
    pub fn new() -> Self {
        Self
    }
}

impl<G: GameState> RolloutPolicy<G> for UniformRollout {
    #[inline]
    fn choose_move<R: Rng>(
        &mut self,
        _state: &G,
        _player: Player,
        legal_moves: &[G::Move],
        rng: &mut R,
    ) -> G::Move {
        legal_moves[rng.gen_range(0..legal_moves.len())]
    }
}

/// Result of one rollout.
#[derive(Debug, Clone, PartialEq)]
pub struct Playout<M> {
    /// Final result. A truncated rollout is a draw.
    pub outcome: Outcome,
    /// Every move played, in order, with the player who made it
    pub moves: Vec<(M, Player)>,
    /// The ply cap ended the rollout before the game did
    pub truncated: bool,
}

/// Play `state` out with `policy`, `first_mover` moving first.
///
/// A terminal input yields its outcome with no moves. With `max_plies` set,
/// a rollout still running after that many moves is scored as a draw.
pub fn playout<G, P, R>(
    mut state: G,
    first_mover: Player,
    policy: &mut P,
    max_plies: Option<u32>,
    rng: &mut R,
) -> Result<Playout<G::Move>, SearchError>
where
    G: GameState,
    P: RolloutPolicy<G>,
    R: Rng,
{
    let mut moves = Vec::new();
    let mut player = first_mover;

    loop {
        if let Some(outcome) = state.outcome() {
            return Ok(Playout {
                outcome,
                moves,
                truncated: false,
            });
        }

        if max_plies.is_some_and(|cap| moves.len() as u64 >= u64::from(cap)) {
            trace!(plies = moves.len(), "Rollout truncated at ply cap");
            return Ok(Playout {
                outcome: Outcome::Draw,
                moves,
                truncated: true,
            });
        }

        let legal = state.legal_moves();
        if legal.is_empty() {
            return Err(SearchError::InvalidState(
                "non-terminal state has no legal moves".to_string(),
            ));
        }

        let mv = policy.choose_move(&state, player, &legal, rng);
        state.apply_move(mv, player)?;
        moves.push((mv, player));
        player = player.opponent();
    }
}
