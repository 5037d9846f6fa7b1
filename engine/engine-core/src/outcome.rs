//! Game outcomes and the credit each player receives for them.

use crate::player::Player;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The given player won.
    Win(Player),
    /// Nobody won. Hex itself cannot draw, but the contract allows it so
    /// draw-capable variants and capped rollouts are handled uniformly.
    Draw,
}

impl Outcome {
    /// Credit awarded to `player` for this outcome.
    ///
    /// # Returns
    /// * `1.0` if `player` won
    /// * `0.5` for a draw
    /// * `0.0` if `player` lost
    ///
    /// # Example
    /// ```
    /// use engine_core::{Outcome, Player};
    ///
    /// assert_eq!(Outcome::Win(Player::One).credit_for(Player::One), 1.0);
    /// assert_eq!(Outcome::Win(Player::One).credit_for(Player::Two), 0.0);
    /// assert_eq!(Outcome::Draw.credit_for(Player::Two), 0.5);
    /// ```
    #[inline]
    pub fn credit_for(self, player: Player) -> f64 {
        match self {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => 0.0,
            Outcome::Draw => 0.5,
        }
    }

    /// The winning player, if any.
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(player) => Some(player),
            Outcome::Draw => None,
        }
    }

    /// Whether this outcome is a draw.
    #[inline]
    pub fn is_draw(self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_sums_to_one() {
        for outcome in [Outcome::Win(Player::One), Outcome::Win(Player::Two), Outcome::Draw] {
            let total = outcome.credit_for(Player::One) + outcome.credit_for(Player::Two);
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_winner() {
        assert_eq!(Outcome::Win(Player::Two).winner(), Some(Player::Two));
        assert_eq!(Outcome::Draw.winner(), None);
        assert!(Outcome::Draw.is_draw());
        assert!(!Outcome::Win(Player::One).is_draw());
    }
}
