//! Per-node RAVE (all-moves-as-first) statistics.
//!
//! Every tree node owns one table. It aggregates, for each move, how often
//! the player to move at that node played it somewhere in a rollout that
//! passed through the node, and how often that player went on to win. The
//! entries are independent of which child (if any) owns the move.
//!
//! Moves are addressed by their dense index from `GameState::move_index`, so
//! the table is a flat array allocated on the first update.

/// RAVE counters for one move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RaveStats {
    /// Rollouts in which the move was played by the node's player to move
    pub visits: u32,
    /// Credit those rollouts earned for that player (1 per win, 0.5 per draw)
    pub wins: f64,
}

impl RaveStats {
    /// RAVE win rate, 0.0 when the move was never observed.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }
}

/// Move index -> RAVE counters for one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaveTable {
    entries: Vec<RaveStats>,
}

impl RaveTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for a move. Unobserved moves report zero evidence.
    #[inline]
    pub fn get(&self, move_index: usize) -> RaveStats {
        self.entries.get(move_index).copied().unwrap_or_default()
    }

    /// Record one rollout observation of a move.
    ///
    /// `action_space` sizes the backing array on first use so later updates
    /// never reallocate.
    pub fn record(&mut self, move_index: usize, action_space: usize, credit: f64) {
        if move_index >= self.entries.len() {
            self.entries
                .resize(action_space.max(move_index + 1), RaveStats::default());
        }
        let entry = &mut self.entries[move_index];
        entry.visits += 1;
        entry.wins += credit;
    }

    /// Number of moves with at least one observation.
    pub fn observed(&self) -> usize {
        self.entries.iter().filter(|e| e.visits > 0).count()
    }

    /// Whether no rollout has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.observed() == 0
    }

    /// Observed moves with their counters, in move-index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, RaveStats)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.visits > 0)
            .map(|(i, e)| (i, *e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entries_are_zero() {
        let table = RaveTable::new();
        assert_eq!(table.get(5), RaveStats::default());
        assert!(table.is_empty());
        assert!(table.get(5).win_rate().abs() < 1e-12);
    }

    #[test]
    fn test_record() {
        let mut table = RaveTable::new();
        table.record(3, 9, 1.0);
        table.record(3, 9, 0.0);
        table.record(8, 9, 0.5);

        assert_eq!(table.get(3).visits, 2);
        assert!((table.get(3).win_rate() - 0.5).abs() < 1e-12);
        assert!((table.get(8).wins - 0.5).abs() < 1e-12);
        assert_eq!(table.get(0), RaveStats::default());
        assert_eq!(table.observed(), 2);

        let observed: Vec<usize> = table.iter().map(|(i, _)| i).collect();
        assert_eq!(observed, vec![3, 8]);
    }

    #[test]
    fn test_record_beyond_action_space_grows() {
        let mut table = RaveTable::new();
        table.record(12, 4, 1.0);
        assert_eq!(table.get(12).visits, 1);
    }
}
