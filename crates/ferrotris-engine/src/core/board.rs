use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use super::{
    BOARD_COLS, BOARD_ROWS, MAX_CLEARED_LINES,
    bit_board::BitBoard,
    piece::{Piece, PieceKind},
};

/// A single cell of the live board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Locked block, tagged with the piece it came from.
    Occupied(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(kind) => Some(kind),
        }
    }
}

type Row = [Cell; BOARD_COLS];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_COLS];

/// The live 20×10 grid of locked cells.
///
/// `Board` keeps which piece each block came from, so a renderer can color
/// it. Collision checks and the search run on the [`BitBoard`] snapshot
/// returned by [`Board::to_bit_board`].
///
/// # Example
///
/// ```
/// use ferrotris_engine::{Board, Cell, Piece, PieceKind};
///
/// let board = Board::new();
/// let piece = Piece::new(PieceKind::L);
/// let placed = board.placed(&piece);
///
/// assert!(!board.is_occupied(0, 5));
/// assert_eq!(placed.cell(0, 5), Cell::Occupied(PieceKind::L));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; BOARD_ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_ROWS],
        }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.rows[row][col].is_occupied()
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_COLS]> + '_ {
        self.rows.iter()
    }

    /// Checks whether any block of the piece is out of bounds or on an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(row, col)| match in_bounds(row, col) {
            Some((row, col)) => self.is_occupied(row, col),
            None => true,
        })
    }

    /// Merges the piece into the grid. Blocks outside the grid are dropped.
    pub fn lock_piece(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            if let Some((row, col)) = in_bounds(row, col) {
                self.rows[row][col] = Cell::Occupied(piece.kind());
            }
        }
    }

    /// Returns a new board with the piece merged in, leaving `self` untouched.
    #[must_use]
    pub fn placed(&self, piece: &Piece) -> Self {
        let mut board = self.clone();
        board.lock_piece(piece);
        board
    }

    /// Indices of complete rows, scanned from the bottom up and capped at four.
    #[must_use]
    pub fn complete_rows(&self) -> ArrayVec<usize, MAX_CLEARED_LINES> {
        (0..BOARD_ROWS)
            .rev()
            .filter(|&row| self.rows[row].iter().all(|c| c.is_occupied()))
            .take(MAX_CLEARED_LINES)
            .collect()
    }

    /// Removes the given rows.
    ///
    /// Rows are removed one at a time in increasing index order; every row
    /// above a removed one moves down by one and an empty row enters at the top.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        let mut sorted: ArrayVec<usize, MAX_CLEARED_LINES> = rows.iter().copied().collect();
        sorted.sort_unstable();
        for row in sorted {
            self.rows.copy_within(0..row, 1);
            self.rows[0] = EMPTY_ROW;
        }
    }

    #[must_use]
    pub fn column_heights(&self) -> [u8; BOARD_COLS] {
        self.to_bit_board().column_heights()
    }

    /// Occupancy snapshot for collision checks and the placement search.
    #[must_use]
    pub fn to_bit_board(&self) -> BitBoard {
        let mut bits = BitBoard::EMPTY;
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_occupied() {
                    #[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                    bits.occupy(row as i32, col as i32);
                }
            }
        }
        bits
    }

    /// Creates a `Board` from ASCII art.
    ///
    /// Piece letters (`I`, `O`, `T`, ...) mark occupied cells of that kind,
    /// `#` marks an occupied cell tagged as `I`, and `.` marks an empty cell.
    /// Fewer than 20 lines are aligned to the bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have 10 cells or there are more than 20 lines.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= BOARD_ROWS, "at most {BOARD_ROWS} rows");
        let offset = BOARD_ROWS - lines.len();

        let mut board = Self::new();
        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<Cell> = line
                .trim()
                .chars()
                .map(|ch| match ch {
                    '.' => Cell::Empty,
                    '#' => Cell::Occupied(PieceKind::I),
                    _ => PieceKind::from_char(ch)
                        .map_or_else(|| panic!("unexpected cell {ch:?}"), Cell::Occupied),
                })
                .collect();
            assert_eq!(cells.len(), BOARD_COLS, "row {y} must have {BOARD_COLS} cells");
            board.rows[offset + y].copy_from_slice(&cells);
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                f.write_char(cell.kind().map_or('.', PieceKind::as_char))?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

fn in_bounds(row: i32, col: i32) -> Option<(usize, usize)> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    (row < BOARD_ROWS && col < BOARD_COLS).then_some((row, col))
}
