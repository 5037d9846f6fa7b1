//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Parent links are plain indices, so walking from a leaf back to the root
//! during backpropagation needs no reference counting.

use engine_core::{GameState, Player};

use crate::node::{NodeId, SearchNode};
use crate::rollout::Playout;
use crate::score;
use crate::search::SearchError;

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree<G: GameState> {
    /// Arena storing all nodes
    nodes: Vec<SearchNode<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: GameState> SearchTree<G> {
    /// Create a tree rooted at `state`, searched on behalf of `acting`.
    pub fn new(state: G, acting: Player) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(state, acting)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<G> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<G> {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: SearchNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[SearchNode<G>] {
        &self.nodes
    }

    /// Select the child of `node_id` with the highest UCT-RAVE score.
    ///
    /// Ties go to the child expanded first. Returns None for a node without
    /// children.
    pub fn select_child(
        &self,
        node_id: NodeId,
        rave_constant: f64,
        exploration_constant: f64,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best: Option<(NodeId, f64)> = None;

        for &(_, child_id) in &node.children {
            let s = score::score(node, self.get(child_id), rave_constant, exploration_constant);
            match best {
                Some((_, best_score)) if s <= best_score => {}
                _ => best = Some((child_id, s)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Add a child for `mv`, played by `mover`, whose result is `state`.
    ///
    /// The move must not already have a child under this parent. It is
    /// removed from the parent's untried moves if still listed there.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        mv: G::Move,
        mover: Player,
        state: G,
    ) -> Result<NodeId, SearchError> {
        if self.get(parent_id).child_for(mv).is_some() {
            return Err(SearchError::InvariantViolation(format!(
                "node {} already has a child for {mv:?}",
                parent_id.0
            )));
        }

        let child_id = self.allocate(SearchNode::new_child(parent_id, mv, mover, state));

        let parent = self.get_mut(parent_id);
        parent.untried_moves.retain(|m| *m != mv);
        parent.children.push((mv, child_id));

        Ok(child_id)
    }

    /// Propagate a rollout result from `leaf_id` up to the root.
    ///
    /// Every node on the path gets one visit and the outcome's credit for
    /// the player who moved into it. Its RAVE table records each rollout
    /// move made by the node's player to move, credited with that player's
    /// result.
    pub fn backpropagate(&mut self, leaf_id: NodeId, playout: &Playout<G::Move>) {
        let outcome = playout.outcome;
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visits += 1;
            node.wins += outcome.credit_for(node.player_who_moved);

            let to_move = node.player_to_move();
            let credit = outcome.credit_for(to_move);
            let action_space = node.state.action_space();
            for &(mv, mover) in &playout.moves {
                if mover == to_move {
                    let index = node.state.move_index(mv);
                    node.rave.record(index, action_space, credit);
                }
            }

            current_id = node.parent;
        }
    }

    /// Root child with the most visits, first expanded on ties.
    /// Returns (move, visits) or None if the root has no children.
    pub fn best_move(&self) -> Option<(G::Move, u32)> {
        let root = self.get(self.root);
        let mut best: Option<(G::Move, u32)> = None;

        for &(mv, id) in &root.children {
            let visits = self.get(id).visits;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((mv, visits)),
            }
        }

        best
    }

    /// Per-move statistics for the root's children, in expansion order.
    pub fn root_move_stats(&self) -> Vec<MoveStats<G::Move>> {
        let root = self.get(self.root);
        root.children
            .iter()
            .map(|&(mv, id)| {
                let child = self.get(id);
                let rave = root.rave.get(root.state.move_index(mv));
                MoveStats {
                    mv,
                    visits: child.visits,
                    wins: child.wins,
                    win_rate: child.win_rate(),
                    rave_visits: rave.visits,
                    rave_win_rate: rave.win_rate(),
                }
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            root_win_rate: root.win_rate(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }

    /// Verify the structural invariants of the tree.
    ///
    /// - a node's untried moves and its children's moves are disjoint
    /// - every child points back at its parent and was made by the parent's
    ///   player to move
    /// - a child never has more visits than its parent
    /// - win credit is finite, non-negative and at most the visit count
    pub fn check_invariants(&self) -> Result<(), SearchError> {
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index as u32);

            if !node.wins.is_finite() || node.wins < 0.0 || node.wins > node.visits as f64 {
                return Err(SearchError::InvariantViolation(format!(
                    "node {index} has {} wins over {} visits",
                    node.wins, node.visits
                )));
            }

            for &(mv, child_id) in &node.children {
                if node.untried_moves.contains(&mv) {
                    return Err(SearchError::InvariantViolation(format!(
                        "node {index} lists expanded move {mv:?} as untried"
                    )));
                }

                let child = self.get(child_id);
                if child.parent != id || child.mv != Some(mv) {
                    return Err(SearchError::InvariantViolation(format!(
                        "child {} is not linked to node {index} by {mv:?}",
                        child_id.0
                    )));
                }
                if child.player_who_moved != node.player_to_move() {
                    return Err(SearchError::InvariantViolation(format!(
                        "child {} was moved by {} but {} is to move at node {index}",
                        child_id.0,
                        child.player_who_moved,
                        node.player_to_move()
                    )));
                }
                if child.visits > node.visits {
                    return Err(SearchError::InvariantViolation(format!(
                        "child {} has {} visits, parent {index} has {}",
                        child_id.0, child.visits, node.visits
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Statistics for one root move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveStats<M> {
    pub mv: M,
    pub visits: u32,
    pub wins: f64,
    pub win_rate: f64,
    /// RAVE observations of this move at the root
    pub rave_visits: u32,
    pub rave_win_rate: f64,
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    /// Root win rate from the perspective of the player who moved into it,
    /// i.e. the searcher's opponent
    pub root_win_rate: f64,
    pub max_depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Outcome;
    use games_hex::{HexBoard, HexMove};

    fn child_state(parent: &HexBoard, mv: HexMove, mover: Player) -> HexBoard {
        let mut state = parent.clone();
        state.apply_move(mv, mover).unwrap();
        state
    }

    #[test]
    fn test_new_tree() {
        let tree = SearchTree::new(HexBoard::new(3).unwrap(), Player::One);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));

        let root = tree.get(tree.root());
        assert!(root.parent.is_none());
        assert_eq!(root.player_to_move(), Player::One);
        assert_eq!(root.untried_moves.len(), 9);
    }

    #[test]
    fn test_add_child() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let mv = HexMove::new(1, 1);

        let child_id = tree
            .add_child(tree.root(), mv, Player::One, child_state(&board, mv, Player::One))
            .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(child_id, NodeId(1));

        let root = tree.get(tree.root());
        assert_eq!(root.children, vec![(mv, NodeId(1))]);
        assert!(!root.untried_moves.contains(&mv));
        assert_eq!(root.untried_moves.len(), 8);

        let child = tree.get(child_id);
        assert_eq!(child.parent, tree.root());
        assert_eq!(child.mv, Some(mv));
        assert_eq!(child.untried_moves.len(), 8);
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_add_duplicate_child_fails() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let mv = HexMove::new(0, 0);
        let state = child_state(&board, mv, Player::One);

        tree.add_child(tree.root(), mv, Player::One, state.clone()).unwrap();
        let err = tree.add_child(tree.root(), mv, Player::One, state).unwrap_err();
        assert!(matches!(err, SearchError::InvariantViolation(_)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_backpropagate_credits_and_rave() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let a = HexMove::new(0, 0);
        let child_id = tree
            .add_child(tree.root(), a, Player::One, child_state(&board, a, Player::One))
            .unwrap();

        // Rollout from the child: Two, One, Two
        let playout = Playout {
            outcome: Outcome::Win(Player::One),
            moves: vec![
                (HexMove::new(1, 0), Player::Two),
                (HexMove::new(2, 2), Player::One),
                (HexMove::new(2, 0), Player::Two),
            ],
            truncated: false,
        };
        tree.backpropagate(child_id, &playout);

        let root = tree.get(tree.root());
        let child = tree.get(child_id);
        assert_eq!(root.visits, 1);
        assert_eq!(child.visits, 1);

        // Root was "moved into" by Two, the child by One
        assert!(root.wins.abs() < 1e-12);
        assert!((child.wins - 1.0).abs() < 1e-12);

        // Root RAVE: One's rollout moves only, credited with One's win
        let size = board.size();
        let idx = |mv: HexMove| mv.row() * size + mv.col();
        assert_eq!(root.rave.observed(), 1);
        assert_eq!(root.rave.get(idx(HexMove::new(2, 2))).visits, 1);
        assert!((root.rave.get(idx(HexMove::new(2, 2))).wins - 1.0).abs() < 1e-12);

        // Child RAVE: Two's rollout moves, credited with Two's loss
        assert_eq!(child.rave.observed(), 2);
        assert_eq!(child.rave.get(idx(HexMove::new(1, 0))).visits, 1);
        assert!(child.rave.get(idx(HexMove::new(1, 0))).wins.abs() < 1e-12);
        assert_eq!(child.rave.get(idx(HexMove::new(2, 2))).visits, 0);
    }

    #[test]
    fn test_backpropagate_draw_gives_half_credit() {
        let mut tree = SearchTree::new(HexBoard::new(3).unwrap(), Player::Two);
        let playout = Playout {
            outcome: Outcome::Draw,
            moves: vec![(HexMove::new(0, 0), Player::Two)],
            truncated: true,
        };
        tree.backpropagate(tree.root(), &playout);

        let root = tree.get(tree.root());
        assert!((root.wins - 0.5).abs() < 1e-12);
        assert!((root.rave.get(0).wins - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_select_child_prefers_unvisited_then_first() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let moves = [HexMove::new(0, 0), HexMove::new(0, 1), HexMove::new(0, 2)];
        let ids: Vec<NodeId> = moves
            .iter()
            .map(|&mv| {
                tree.add_child(tree.root(), mv, Player::One, child_state(&board, mv, Player::One))
                    .unwrap()
            })
            .collect();

        // All unvisited: first child wins the tie
        assert_eq!(tree.select_child(tree.root(), 300.0, 1.4), Some(ids[0]));

        tree.get_mut(tree.root()).visits = 2;
        tree.get_mut(ids[0]).visits = 1;
        tree.get_mut(ids[0]).wins = 1.0;
        assert_eq!(tree.select_child(tree.root(), 300.0, 1.4), Some(ids[1]));

        // Leaf has nothing to select
        assert_eq!(tree.select_child(ids[0], 300.0, 1.4), None);
    }

    #[test]
    fn test_best_move_ties_go_to_first_child() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        assert!(tree.best_move().is_none());

        let a = HexMove::new(0, 0);
        let b = HexMove::new(2, 2);
        let ia = tree
            .add_child(tree.root(), a, Player::One, child_state(&board, a, Player::One))
            .unwrap();
        let ib = tree
            .add_child(tree.root(), b, Player::One, child_state(&board, b, Player::One))
            .unwrap();

        tree.get_mut(ia).visits = 5;
        tree.get_mut(ib).visits = 5;
        assert_eq!(tree.best_move(), Some((a, 5)));

        tree.get_mut(ib).visits = 6;
        assert_eq!(tree.best_move(), Some((b, 6)));
    }

    #[test]
    fn test_check_invariants_detects_visit_excess() {
        let board = HexBoard::new(2).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let mv = HexMove::new(0, 0);
        let child = tree
            .add_child(tree.root(), mv, Player::One, child_state(&board, mv, Player::One))
            .unwrap();

        tree.get_mut(child).visits = 3;
        assert!(matches!(
            tree.check_invariants(),
            Err(SearchError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_tree_stats() {
        let board = HexBoard::new(3).unwrap();
        let mut tree = SearchTree::new(board.clone(), Player::One);
        let mv = HexMove::new(1, 1);
        tree.add_child(tree.root(), mv, Player::One, child_state(&board, mv, Player::One))
            .unwrap();

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.root_visits, 0);
    }
}
