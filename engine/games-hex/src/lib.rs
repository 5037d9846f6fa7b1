//! Hex game implementation for the search engine
//!
//! Hex is a two-player connection game played on an N×N rhombus of hexagonal
//! cells. Players alternately place a stone on any empty cell. `Player::One`
//! wins by connecting the top and bottom rows, `Player::Two` by connecting
//! the left and right columns. A full board always contains exactly one
//! connection, so the game cannot end in a draw.
//!
//! # Board Layout
//!
//! Cells are stored in row-major order. Each row is shifted half a cell to
//! the right of the one above it, which gives every cell six neighbours:
//! ```text
//!   a b c
//!  1 . . .
//!   2 . . .
//!    3 . . .
//! ```
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{GameState, Player};
//! use games_hex::{HexBoard, HexMove};
//!
//! let mut board = HexBoard::new(3).unwrap();
//! for row in 0..3 {
//!     board.apply_move(HexMove::new(row, 1), Player::One).unwrap();
//! }
//! assert_eq!(board.winner(), Some(Player::One));
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use engine_core::{GameError, GameState, Player};

/// Largest supported board side. Keeps column letters within `a..=s`.
pub const MAX_SIZE: usize = 19;

/// Neighbour offsets `(d_row, d_col)` on the rhombus.
pub const NEIGHBOURS: [(isize, isize); 6] = [(0, 1), (1, 0), (-1, 0), (0, -1), (1, -1), (-1, 1)];

/// A board cell, identified by zero-based row and column.
///
/// Displayed as `<column letter><1-based row>`, e.g. `HexMove::new(2, 0)` is `a3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexMove {
    row: u8,
    col: u8,
}

impl HexMove {
    /// Create a move for the given zero-based coordinates.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    #[inline]
    pub const fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub const fn col(self) -> usize {
        self.col as usize
    }
}

impl fmt::Display for HexMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, self.row + 1)
    }
}

impl FromStr for HexMove {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| GameError::IllegalMove(format!("'{s}' does not start with a column letter")))?;
        let col = letter.to_ascii_lowercase() as usize - 'a' as usize;
        let row: usize = chars
            .as_str()
            .parse()
            .map_err(|_| GameError::IllegalMove(format!("'{s}' has no valid row number")))?;

        if row == 0 || row > MAX_SIZE || col >= MAX_SIZE {
            return Err(GameError::IllegalMove(format!("'{s}' is outside any supported board")));
        }

        Ok(Self::new((row - 1) as u8, col as u8))
    }
}

/// Hex board state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBoard {
    size: usize,
    /// Row-major cells: `None` = empty
    cells: Vec<Option<Player>>,
    /// Number of empty cells remaining
    empty: usize,
    /// Cached winner, updated on every placement
    winner: Option<Player>,
}

impl HexBoard {
    /// Create an empty board with `size` × `size` cells.
    pub fn new(size: usize) -> Result<Self, GameError> {
        if size == 0 || size > MAX_SIZE {
            return Err(GameError::InvalidPosition(format!(
                "board size must be between 1 and {MAX_SIZE}, got {size}"
            )));
        }

        Ok(Self {
            size,
            cells: vec![None; size * size],
            empty: size * size,
            winner: None,
        })
    }

    /// Parse a position from one string per row.
    ///
    /// Whitespace is ignored. `.` is empty, `X`/`1` is `Player::One`,
    /// `O`/`2` is `Player::Two`. Positions where both players are connected
    /// are rejected.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let mut board = Self::new(rows.len())?;

        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != board.size {
                return Err(GameError::InvalidPosition(format!(
                    "row {} has {} cells, expected {}",
                    row + 1,
                    symbols.len(),
                    board.size
                )));
            }

            for (col, symbol) in symbols.into_iter().enumerate() {
                let stone = match symbol {
                    '.' => None,
                    'X' | 'x' | '1' => Some(Player::One),
                    'O' | 'o' | '2' => Some(Player::Two),
                    other => {
                        return Err(GameError::InvalidPosition(format!(
                            "unexpected symbol '{other}' at row {}",
                            row + 1
                        )))
                    }
                };
                if stone.is_some() {
                    let idx = board.index(row, col);
                    board.cells[idx] = stone;
                    board.empty -= 1;
                }
            }
        }

        let one = board.check_connection(Player::One);
        let two = board.check_connection(Player::Two);
        board.winner = match (one, two) {
            (true, true) => {
                return Err(GameError::InvalidPosition(
                    "both players are connected".to_string(),
                ))
            }
            (true, false) => Some(Player::One),
            (false, true) => Some(Player::Two),
            (false, false) => None,
        };

        Ok(board)
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Stone at the given cell, `None` if empty or off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells[self.index(row, col)]
    }

    /// Number of stones `player` has on the board.
    pub fn stone_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    /// Number of empty cells.
    #[inline]
    pub fn empty_cells(&self) -> usize {
        self.empty
    }

    /// Place a stone for `player`, validating bounds and emptiness.
    pub fn place(&mut self, row: usize, col: usize, player: Player) -> Result<(), GameError> {
        if row >= self.size || col >= self.size {
            return Err(GameError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }

        let idx = self.index(row, col);
        if let Some(owner) = self.cells[idx] {
            return Err(GameError::IllegalMove(format!(
                "{} is already occupied by {owner}",
                HexMove::new(row as u8, col as u8)
            )));
        }

        self.cells[idx] = Some(player);
        self.empty -= 1;

        if self.connects_through(row, col, player) {
            self.winner = Some(player);
        }

        Ok(())
    }

    /// Whether `player` touches the edge it starts from at (row, col).
    #[inline]
    fn on_start_edge(&self, player: Player, row: usize, col: usize) -> bool {
        match player {
            Player::One => row == 0,
            Player::Two => col == 0,
        }
    }

    #[inline]
    fn on_target_edge(&self, player: Player, row: usize, col: usize) -> bool {
        match player {
            Player::One => row == self.size - 1,
            Player::Two => col == self.size - 1,
        }
    }

    fn neighbours(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOURS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < self.size && c < self.size).then_some((r, c))
        })
    }

    /// Whether `player` has connected their two edges.
    ///
    /// Breadth-first search from every stone on the player's starting edge.
    pub fn check_connection(&self, player: Player) -> bool {
        let mut visited = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();

        for i in 0..self.size {
            let (row, col) = match player {
                Player::One => (0, i),
                Player::Two => (i, 0),
            };
            let idx = self.index(row, col);
            if self.cells[idx] == Some(player) {
                visited[idx] = true;
                queue.push_back((row, col));
            }
        }

        while let Some((row, col)) = queue.pop_front() {
            if self.on_target_edge(player, row, col) {
                return true;
            }
            for (r, c) in self.neighbours(row, col) {
                let idx = self.index(r, c);
                if !visited[idx] && self.cells[idx] == Some(player) {
                    visited[idx] = true;
                    queue.push_back((r, c));
                }
            }
        }

        false
    }

    /// Whether the group containing the stone at (row, col) spans both of
    /// `player`'s edges. Only the group touched by the last placement can
    /// have become winning, so this is all `place` needs to check.
    fn connects_through(&self, row: usize, col: usize, player: Player) -> bool {
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![(row, col)];
        visited[self.index(row, col)] = true;
        let (mut start, mut target) = (false, false);

        while let Some((r, c)) = stack.pop() {
            start |= self.on_start_edge(player, r, c);
            target |= self.on_target_edge(player, r, c);
            if start && target {
                return true;
            }
            for (nr, nc) in self.neighbours(r, c) {
                let idx = self.index(nr, nc);
                if !visited[idx] && self.cells[idx] == Some(player) {
                    visited[idx] = true;
                    stack.push((nr, nc));
                }
            }
        }

        false
    }
}

impl GameState for HexBoard {
    type Move = HexMove;

    fn legal_moves(&self) -> Vec<HexMove> {
        if self.is_terminal() {
            return Vec::new();
        }

        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| HexMove::new((idx / self.size) as u8, (idx % self.size) as u8))
            .collect()
    }

    fn apply_move(&mut self, mv: HexMove, player: Player) -> Result<(), GameError> {
        self.place(mv.row(), mv.col(), player)
    }

    #[inline]
    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.empty == 0
    }

    #[inline]
    fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[inline]
    fn action_space(&self) -> usize {
        self.size * self.size
    }

    #[inline]
    fn move_index(&self, mv: HexMove) -> usize {
        self.index(mv.row(), mv.col())
    }
}

impl fmt::Display for HexBoard {
    /// Slanted layout with column letters on top and row numbers on the left.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "    ")?;
        for col in 0..self.size {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;

        for row in 0..self.size {
            write!(f, "{}{:>2}  ", " ".repeat(row), row + 1)?;
            for col in 0..self.size {
                let symbol = match self.cells[self.index(row, col)] {
                    None => '.',
                    Some(Player::One) => 'X',
                    Some(Player::Two) => 'O',
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
