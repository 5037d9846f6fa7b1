//! MCTS tree node representation.
//!
//! Each node represents a game state reached by one player moving from the
//! parent state. Nodes hold the standard visit/win counters, the moves not yet
//! expanded, and a RAVE table for the moves of the player to move here.

use engine_core::{GameState, Player};

use crate::rave::RaveTable;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode<G: GameState> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Move that led here from the parent (None for root)
    pub mv: Option<G::Move>,

    /// Player who made `mv`. For the root this is the opponent of the
    /// player the search is run for, so the searcher moves first.
    pub player_who_moved: Player,

    /// Game state at this node
    pub state: G,

    /// Whether the state is terminal (cached from `state.is_terminal()`)
    pub is_terminal: bool,

    /// Legal moves not yet expanded into children
    pub untried_moves: Vec<G::Move>,

    /// Children: (move, NodeId) pairs in expansion order
    pub children: Vec<(G::Move, NodeId)>,

    /// Number of iterations that passed through this node
    pub visits: u32,

    /// Win credit for `player_who_moved` over those iterations
    pub wins: f64,

    /// RAVE statistics for moves of the player to move at this node
    pub rave: RaveTable,
}

impl<G: GameState> SearchNode<G> {
    /// Create a root node for a search run on behalf of `acting`.
    pub fn new_root(state: G, acting: Player) -> Self {
        Self::new(NodeId::NONE, None, acting.opponent(), state)
    }

    /// Create a child node for `mv` played by `mover`, resulting in `state`.
    pub fn new_child(parent: NodeId, mv: G::Move, mover: Player, state: G) -> Self {
        Self::new(parent, Some(mv), mover, state)
    }

    fn new(parent: NodeId, mv: Option<G::Move>, player_who_moved: Player, state: G) -> Self {
        let is_terminal = state.is_terminal();
        let untried_moves = if is_terminal {
            Vec::new()
        } else {
            state.legal_moves()
        };

        Self {
            parent,
            mv,
            player_who_moved,
            state,
            is_terminal,
            untried_moves,
            children: Vec::new(),
            visits: 0,
            wins: 0.0,
            rave: RaveTable::new(),
        }
    }

    /// Player whose turn it is at this node.
    #[inline]
    pub fn player_to_move(&self) -> Player {
        self.player_who_moved.opponent()
    }

    /// All legal moves have a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Check if this is a leaf node (terminal or no children yet).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || self.children.is_empty()
    }

    /// Win rate from the perspective of `player_who_moved`.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// Child reached by `mv`, if expanded.
    pub fn child_for(&self, mv: G::Move) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(child_mv, _)| *child_mv == mv)
            .map(|(_, id)| *id)
    }
}
