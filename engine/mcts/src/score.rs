//! UCT-RAVE child scoring.
//!
//! The score blends a child's own win rate with the parent's RAVE estimate
//! for the child's move, then adds the UCT exploration bonus:
//!
//! ```text
//! beta  = sqrt(k / (3n + k))
//! value = (1 - beta) * wins/n + beta * rave_wins/rave_visits
//! score = value + c * sqrt(ln(N) / n)
//! ```
//!
//! where `n` is the child's visit count, `N` the parent's, and `k` the RAVE
//! constant. Unvisited children score `+inf` so every child is tried once
//! before any is revisited.

use engine_core::GameState;

use crate::node::SearchNode;
use crate::rave::RaveStats;

/// RAVE weight for a child with `visits` visits.
///
/// Lies in `[0, 1]`, is non-increasing in `visits` and tends to 0 as visits
/// grow. `k = 0` gives 0 everywhere (plain UCT); `k = inf` gives 1.
#[inline]
pub fn rave_beta(rave_constant: f64, visits: u32) -> f64 {
    if rave_constant <= 0.0 {
        return 0.0;
    }
    if rave_constant.is_infinite() {
        return 1.0;
    }
    (rave_constant / (3.0 * visits as f64 + rave_constant)).sqrt()
}

/// Plain UCT score. `+inf` for an unvisited child.
#[inline]
pub fn uct_score(parent_visits: u32, visits: u32, wins: f64, exploration_constant: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let n = visits as f64;
    wins / n + exploration_bonus(parent_visits, n, exploration_constant)
}

/// UCT-RAVE score from raw counters. `+inf` for an unvisited child.
///
/// A move with no RAVE observations contributes a RAVE win rate of 0.
#[inline]
pub fn uct_rave_score(
    parent_visits: u32,
    visits: u32,
    wins: f64,
    rave: RaveStats,
    rave_constant: f64,
    exploration_constant: f64,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let n = visits as f64;
    let beta = rave_beta(rave_constant, visits);
    let value = (1.0 - beta) * (wins / n) + beta * rave.win_rate();
    value + exploration_bonus(parent_visits, n, exploration_constant)
}

#[inline]
fn exploration_bonus(parent_visits: u32, visits: f64, c: f64) -> f64 {
    // A visited child implies a visited parent; max(1) keeps ln finite anyway
    let ln_parent = (parent_visits.max(1) as f64).ln();
    c * (ln_parent / visits).sqrt()
}

/// Score `child` for selection from `parent`.
///
/// The child's RAVE term comes from the parent's table, since the parent's
/// player to move is the one who made the child's move.
pub fn score<G: GameState>(
    parent: &SearchNode<G>,
    child: &SearchNode<G>,
    rave_constant: f64,
    exploration_constant: f64,
) -> f64 {
    let rave = child
        .mv
        .map(|mv| parent.rave.get(parent.state.move_index(mv)))
        .unwrap_or_default();

    uct_rave_score(
        parent.visits,
        child.visits,
        child.wins,
        rave,
        rave_constant,
        exploration_constant,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    #[test]
    fn test_beta_bounds_and_monotonicity() {
        for k in [0.0, 1.0, 300.0, 1000.0, 1e9] {
            let mut prev = f64::INFINITY;
            for n in [0, 1, 2, 10, 100, 10_000, 1_000_000] {
                let beta = rave_beta(k, n);
                assert!((0.0..=1.0).contains(&beta), "beta({k}, {n}) = {beta}");
                assert!(beta <= prev);
                prev = beta;
            }
        }

        assert!((rave_beta(300.0, 0) - 1.0).abs() < 1e-12);
        assert!(rave_beta(300.0, 10_000_000) < 0.01);
        assert!(rave_beta(0.0, 0).abs() < 1e-12);
        assert!((rave_beta(f64::INFINITY, 1_000) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_child_is_infinite() {
        let rave = RaveStats { visits: 10, wins: 9.0 };
        assert_eq!(uct_rave_score(5, 0, 0.0, rave, 300.0, SQRT_2), f64::INFINITY);
        assert_eq!(uct_score(5, 0, 0.0, SQRT_2), f64::INFINITY);
    }

    #[test]
    fn test_zero_rave_constant_matches_uct() {
        let rave = RaveStats { visits: 40, wins: 31.0 };
        for (parent, visits, wins) in [(10, 3, 2.0), (100, 40, 12.5), (7, 7, 0.0), (1000, 1, 1.0)] {
            let with_rave = uct_rave_score(parent, visits, wins, rave, 0.0, SQRT_2);
            let plain = uct_score(parent, visits, wins, SQRT_2);
            assert!((with_rave - plain).abs() < 1e-12);
        }
    }

    #[test]
    fn test_more_wins_scores_higher() {
        let rave = RaveStats { visits: 12, wins: 6.0 };
        for k in [0.0, 300.0, f64::INFINITY] {
            let low = uct_rave_score(50, 10, 3.0, rave, k, SQRT_2);
            let high = uct_rave_score(50, 10, 4.0, rave, k, SQRT_2);
            if k.is_infinite() {
                // Pure RAVE ignores local wins
                assert!((high - low).abs() < 1e-12);
            } else {
                assert!(high > low);
            }
        }
    }

    #[test]
    fn test_known_value() {
        // k = 3, n = 1 -> beta = sqrt(3 / 6)
        let rave = RaveStats { visits: 4, wins: 1.0 };
        let beta = 0.5f64.sqrt();
        let expected = (1.0 - beta) * 1.0 + beta * 0.25 + SQRT_2 * (10f64.ln() / 1.0).sqrt();
        let actual = uct_rave_score(10, 1, 1.0, rave, 3.0, SQRT_2);
        assert!((actual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unobserved_rave_counts_as_zero() {
        let score = uct_rave_score(1, 1, 1.0, RaveStats::default(), f64::INFINITY, 0.0);
        assert!(score.abs() < 1e-12);
    }

    #[test]
    fn test_rave_favours_stronger_move_early() {
        // Same child stats, different RAVE evidence
        let strong = RaveStats { visits: 50, wins: 45.0 };
        let weak = RaveStats { visits: 50, wins: 5.0 };
        assert!(
            uct_rave_score(20, 2, 1.0, strong, 300.0, SQRT_2)
                > uct_rave_score(20, 2, 1.0, weak, 300.0, SQRT_2)
        );
    }
}
