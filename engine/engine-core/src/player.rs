//! Player identifiers for two-player games.

use std::fmt;

/// One of the two sides of a game.
///
/// `Player::One` moves first by convention. In Hex it connects the top and
/// bottom edges; `Player::Two` connects left and right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// The other player. Total and involutive: `p.opponent().opponent() == p`.
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Numeric identifier (1 or 2), as used in board dumps and config files.
    #[inline]
    pub const fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Inverse of [`Player::id`].
    pub const fn from_id(id: u8) -> Option<Player> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.id())
    }
}
