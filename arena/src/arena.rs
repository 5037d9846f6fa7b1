//! Single matches and tournaments between two agents.
//!
//! Agent seats are tied to colours: the first agent always plays
//! `Player::One` (top to bottom), the second `Player::Two` (left to right).
//! Which colour moves first varies per game.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use engine_core::{GameState, Player};
use games_hex::{HexBoard, HexMove};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::stats::TournamentSummary;

/// One move of a finished or running match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ply {
    /// 1-based move number
    pub number: usize,
    pub player: Player,
    pub mv: HexMove,
    /// Time the agent spent choosing the move
    pub think_time: Duration,
}

/// Result of one game.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub first: Player,
    pub winner: Player,
    pub plies: Vec<Ply>,
    /// Total thinking time per colour, indexed by `Player::One`/`Player::Two`
    pub think_time: [Duration; 2],
}

impl MatchRecord {
    pub fn time_for(&self, player: Player) -> Duration {
        self.think_time[seat(player)]
    }
}

#[inline]
pub(crate) fn seat(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => 1,
    }
}

/// Play one game to completion.
///
/// `agents[0]` plays `Player::One`, `agents[1]` plays `Player::Two`, and
/// `first` moves first. `on_move` sees the board after every move.
pub fn play_match<F>(
    board_size: usize,
    mut agents: [&mut dyn Agent; 2],
    first: Player,
    mut on_move: F,
) -> Result<MatchRecord>
where
    F: FnMut(&HexBoard, &Ply),
{
    let mut board = HexBoard::new(board_size)?;
    let mut plies = Vec::new();
    let mut think_time = [Duration::ZERO; 2];
    let mut player = first;

    loop {
        let agent = &mut *agents[seat(player)];

        let start = Instant::now();
        let mv = agent.select_move(&board, player)?;
        let elapsed = start.elapsed();
        think_time[seat(player)] += elapsed;

        board
            .apply_move(mv, player)
            .with_context(|| format!("{} agent played illegal move {mv}", agent.name()))?;

        let ply = Ply {
            number: plies.len() + 1,
            player,
            mv,
            think_time: elapsed,
        };
        on_move(&board, &ply);
        plies.push(ply);

        debug!(
            ply = ply.number,
            %player,
            agent = agent.name(),
            mv = %mv,
            think_ms = elapsed.as_millis() as u64,
            "Move played"
        );

        if board.is_terminal() {
            let winner = board
                .winner()
                .ok_or_else(|| anyhow!("game ended without a winner"))?;
            return Ok(MatchRecord {
                first,
                winner,
                plies,
                think_time,
            });
        }

        player = player.opponent();
    }
}

/// Colour that moves first in game `game` (0-based) of `games`.
///
/// `Player::One` starts the first half, `Player::Two` the rest (including
/// the extra game when `games` is odd).
pub fn first_player_for(game: u32, games: u32) -> Player {
    if game < games / 2 {
        Player::One
    } else {
        Player::Two
    }
}

/// Play `games` games between `agents`, swapping the starting colour for
/// the second half.
pub fn run_tournament(
    board_size: usize,
    games: u32,
    agents: &mut [Box<dyn Agent>; 2],
) -> Result<TournamentSummary> {
    let [one, two] = agents;
    let mut summary = TournamentSummary::new(board_size, [one.name(), two.name()]);

    for game in 0..games {
        let first = first_player_for(game, games);
        info!(game = game + 1, games, first = %first, "Starting game");

        let record = play_match(board_size, [&mut **one, &mut **two], first, |_, _| {})?;

        info!(
            game = game + 1,
            winner = %record.winner,
            moves = record.plies.len(),
            time_one_secs = record.time_for(Player::One).as_secs_f64(),
            time_two_secs = record.time_for(Player::Two).as_secs_f64(),
            "Game finished"
        );
        summary.record(&record);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::RandomAgent;

    /// Plays the lowest untaken cell in its column, top to bottom.
    struct ColumnAgent {
        col: u8,
    }

    impl Agent for ColumnAgent {
        fn name(&self) -> &str {
            "column"
        }

        fn select_move(&mut self, board: &HexBoard, _player: Player) -> Result<HexMove> {
            (0..board.size() as u8)
                .map(|row| HexMove::new(row, self.col))
                .find(|mv| board.get(mv.row(), mv.col()).is_none())
                .ok_or_else(|| anyhow!("column {} is full", self.col))
        }
    }

    /// Always plays a1, which is illegal after the first time.
    struct StubbornAgent;

    impl Agent for StubbornAgent {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn select_move(&mut self, _board: &HexBoard, _player: Player) -> Result<HexMove> {
            Ok(HexMove::new(0, 0))
        }
    }

    #[test]
    fn test_play_match_column_race() {
        // One fills column a top to bottom and wins; Two wastes moves in column c
        let mut one = ColumnAgent { col: 0 };
        let mut two = ColumnAgent { col: 2 };
        let mut seen = Vec::new();

        let record = play_match(3, [&mut one, &mut two], Player::One, |board, ply| {
            seen.push((ply.number, board.stone_count(ply.player)));
        })
        .unwrap();

        assert_eq!(record.winner, Player::One);
        assert_eq!(record.first, Player::One);
        assert_eq!(record.plies.len(), 5);
        assert_eq!(record.plies[0].mv, HexMove::new(0, 0));
        assert_eq!(record.plies[1].player, Player::Two);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[4], (5, 3));
    }

    #[test]
    fn test_play_match_second_colour_can_start() {
        let mut one = ColumnAgent { col: 0 };
        let mut two = ColumnAgent { col: 2 };

        let record = play_match(3, [&mut one, &mut two], Player::Two, |_, _| {}).unwrap();
        assert_eq!(record.first, Player::Two);
        assert_eq!(record.plies[0].player, Player::Two);
        // Two's column never connects left to right, so One still wins
        assert_eq!(record.winner, Player::One);
    }

    #[test]
    fn test_illegal_move_is_an_error() {
        let mut one = StubbornAgent;
        let mut two = StubbornAgent;
        let err = play_match(3, [&mut one, &mut two], Player::One, |_, _| {}).unwrap_err();
        assert!(err.to_string().contains("stubborn"));
    }

    #[test]
    fn test_first_player_schedule() {
        let firsts: Vec<Player> = (0..5).map(|g| first_player_for(g, 5)).collect();
        assert_eq!(
            firsts,
            vec![Player::One, Player::One, Player::Two, Player::Two, Player::Two]
        );
    }

    #[test]
    fn test_random_tournament() {
        let mut agents: [Box<dyn Agent>; 2] = [
            Box::new(RandomAgent::with_seed(1)),
            Box::new(RandomAgent::with_seed(2)),
        ];

        let summary = run_tournament(4, 6, &mut agents).unwrap();
        assert_eq!(summary.games, 6);
        assert_eq!(summary.results.len(), 6);
        assert_eq!(summary.seats[0].wins + summary.seats[1].wins, 6);
        assert_eq!(summary.seats[0].games_started, 3);
        assert_eq!(summary.seats[1].games_started, 3);
    }
}
