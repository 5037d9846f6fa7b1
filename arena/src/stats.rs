//! Tournament statistics and reporting.
//!
//! The summary is printed as a grid table and can be written to a JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use engine_core::Player;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::arena::{seat, MatchRecord};

/// Aggregates for one agent seat over a tournament.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub agent: String,
    /// Colour id the seat plays (1 = top/bottom, 2 = left/right)
    pub player: u8,
    pub wins: u32,
    pub games_started: u32,
    pub total_time_secs: f64,
    pub avg_time_per_game_secs: f64,
}

/// Per-game entry of the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    /// 1-based game number
    pub game: u32,
    pub first_player: u8,
    pub winner: u8,
    pub moves: usize,
    /// Thinking time per seat, in seconds
    pub time_secs: [f64; 2],
}

/// Serializable tournament results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub board_size: usize,
    pub games: u32,
    pub seats: [SeatSummary; 2],
    pub results: Vec<GameSummary>,
}

impl TournamentSummary {
    pub fn new(board_size: usize, agents: [&str; 2]) -> Self {
        let seat_for = |agent: &str, player: Player| SeatSummary {
            agent: agent.to_string(),
            player: player.id(),
            ..SeatSummary::default()
        };

        Self {
            board_size,
            games: 0,
            seats: [
                seat_for(agents[0], Player::One),
                seat_for(agents[1], Player::Two),
            ],
            results: Vec::new(),
        }
    }

    /// Add a finished game.
    pub fn record(&mut self, record: &MatchRecord) {
        self.games += 1;
        self.seats[seat(record.winner)].wins += 1;
        self.seats[seat(record.first)].games_started += 1;

        let time_secs = [
            record.time_for(Player::One).as_secs_f64(),
            record.time_for(Player::Two).as_secs_f64(),
        ];
        for (summary, secs) in self.seats.iter_mut().zip(time_secs) {
            summary.total_time_secs += secs;
            summary.avg_time_per_game_secs = summary.total_time_secs / self.games as f64;
        }

        self.results.push(GameSummary {
            game: self.games,
            first_player: record.first.id(),
            winner: record.winner.id(),
            moves: record.plies.len(),
            time_secs,
        });
    }

    /// Render the summary as a grid table.
    pub fn render_table(&self) -> String {
        let [one, two] = &self.seats;
        let rows = [
            [
                "Metric".to_string(),
                format!("Player 1 ({})", one.agent),
                format!("Player 2 ({})", two.agent),
            ],
            ["Wins".to_string(), one.wins.to_string(), two.wins.to_string()],
            [
                "Games starting first".to_string(),
                one.games_started.to_string(),
                two.games_started.to_string(),
            ],
            [
                "Total time (s)".to_string(),
                format!("{:.2}", one.total_time_secs),
                format!("{:.2}", two.total_time_secs),
            ],
            [
                "Avg time/game (s)".to_string(),
                format!("{:.2}", one.avg_time_per_game_secs),
                format!("{:.2}", two.avg_time_per_game_secs),
            ],
        ];

        let mut widths = [0usize; 3];
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let border = |fill: char| {
            let mut line = String::from("+");
            for width in widths {
                line.extend(std::iter::repeat(fill).take(width + 2));
                line.push('+');
            }
            line
        };

        let mut lines = vec![border('-')];
        for (i, row) in rows.iter().enumerate() {
            let cells: String = widths
                .iter()
                .zip(row)
                .map(|(&width, cell)| format!(" {cell:<width$} |"))
                .collect();
            lines.push(format!("|{cells}"));
            lines.push(border(if i == 0 { '=' } else { '-' }));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the summary as pretty JSON (atomic write-then-rename),
    /// creating parent directories.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;

        // Write to temp file then rename (atomic on most filesystems)
        let mut temp_name = path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let written = fs::File::create(&temp_path)
            .and_then(|mut file| file.write_all(json.as_bytes()))
            .and_then(|()| fs::rename(&temp_path, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("failed to write {}", path.display()));
        }

        info!(path = %path.display(), "Wrote tournament summary");
        Ok(())
    }
}
