use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{BOARD_COLS, BOARD_ROWS, MAX_CLEARED_LINES, piece::Piece};

const FULL_ROW_MASK: u16 = (1 << BOARD_COLS) - 1;

/// Compact occupancy snapshot of the board.
///
/// Each row is a `u16` where bit `c` is set when column `c` is occupied; the
/// upper six bits are always clear. The whole board is 40 bytes and `Copy`,
/// so hypothetical placements work on independent copies without aliasing the
/// live board.
///
/// Coordinates follow the board convention: row 0 at the top, column 0 on the
/// left. Anything outside `[0, 20) x [0, 10)` is treated as blocked.
///
/// # Example
///
/// ```
/// use ferrotris_engine::{BitBoard, Piece, PieceKind};
///
/// let board = BitBoard::EMPTY;
/// let piece = Piece::new(PieceKind::O);
/// assert!(!board.collides(&piece));
///
/// let placed = board.with_piece(&piece);
/// assert_eq!(placed.count_occupied(), 4);
/// assert_eq!(board.count_occupied(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard {
    rows: [u16; BOARD_ROWS],
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BitBoard {
    pub const EMPTY: Self = Self {
        rows: [0; BOARD_ROWS],
    };

    /// Returns `true` when the cell is inside the grid and occupied.
    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < BOARD_ROWS && col < BOARD_COLS && self.rows[row] & (1 << col) != 0
    }

    /// Returns `true` when the cell is outside the grid or occupied.
    #[must_use]
    pub fn is_blocked(&self, row: i32, col: i32) -> bool {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) if row < BOARD_ROWS && col < BOARD_COLS => {
                self.rows[row] & (1 << col) != 0
            }
            _ => true,
        }
    }

    /// Checks whether any block of the piece is out of bounds or overlaps an occupied cell.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().any(|(row, col)| self.is_blocked(row, col))
    }

    /// Marks a single in-bounds cell as occupied. Out-of-bounds cells are ignored.
    pub fn occupy(&mut self, row: i32, col: i32) {
        if let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col))
            && row < BOARD_ROWS
            && col < BOARD_COLS
        {
            self.rows[row] |= 1 << col;
        }
    }

    /// Merges the piece's blocks into the board.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for (row, col) in piece.cells() {
            self.occupy(row, col);
        }
    }

    /// Returns a copy of this board with the piece merged in.
    #[must_use]
    pub fn with_piece(&self, piece: &Piece) -> Self {
        let mut board = *self;
        board.fill_piece(piece);
        board
    }

    #[must_use]
    pub fn is_row_complete(&self, row: usize) -> bool {
        self.rows[row] == FULL_ROW_MASK
    }

    /// Indices of complete rows, scanned from the bottom up and capped at four.
    #[must_use]
    pub fn complete_rows(&self) -> ArrayVec<usize, MAX_CLEARED_LINES> {
        (0..BOARD_ROWS)
            .rev()
            .filter(|&row| self.is_row_complete(row))
            .take(MAX_CLEARED_LINES)
            .collect()
    }

    /// Removes complete rows, shifting everything above them down, and
    /// returns the number of rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for row in (0..BOARD_ROWS).rev() {
            if self.rows[row] == FULL_ROW_MASK {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[row + count] = self.rows[row];
            }
        }
        self.rows[..count].fill(0);
        count
    }

    /// Height of each column: 20 minus the number of empty cells above the
    /// topmost occupied cell, or 0 for an empty column.
    #[must_use]
    pub fn column_heights(&self) -> [u8; BOARD_COLS] {
        let mut heights = [0; BOARD_COLS];
        for (col, height) in heights.iter_mut().enumerate() {
            if let Some(top) = (0..BOARD_ROWS).find(|&row| self.rows[row] & (1 << col) != 0) {
                #[expect(clippy::cast_possible_truncation)]
                let h = (BOARD_ROWS - top) as u8;
                *height = h;
            }
        }
        heights
    }

    #[must_use]
    pub fn count_occupied(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Returns an iterator over the rows as bitmasks, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = u16> + '_ {
        self.rows.iter().copied()
    }

    /// Creates a `BitBoard` from ASCII art.
    ///
    /// `#` marks an occupied cell and `.` an empty one. Each non-blank line
    /// must have exactly 10 cells. Fewer than 20 lines are aligned to the
    /// bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have 10 cells or there are more than 20 lines.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= BOARD_ROWS, "at most {BOARD_ROWS} rows");
        let offset = BOARD_ROWS - lines.len();

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                BOARD_COLS,
                "each row must have exactly {BOARD_COLS} cells, got {} at row {y}",
                cells.len(),
            );
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    board.rows[offset + y] |= 1 << x;
                }
            }
        }
        board
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for col in 0..BOARD_COLS {
                f.write_char(if row & (1 << col) != 0 { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // "0000,0000,...,03ff", one hex value per row
        let mut hex = String::with_capacity(BOARD_ROWS * 5);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex.push(',');
            }
            write!(&mut hex, "{row:04x}").map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for BitBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != BOARD_ROWS {
            return Err(serde::de::Error::custom(format!(
                "expected {BOARD_ROWS} comma-separated hex values, got {}",
                parts.len()
            )));
        }

        let mut rows = [0; BOARD_ROWS];
        for (i, hex) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has bits outside the board: {hex}"
                )));
            }
            rows[i] = bits;
        }
        Ok(Self { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::{PieceKind, PiecePosition, PieceRotation};

    #[test]
    fn test_empty_board() {
        let board = BitBoard::EMPTY;
        assert_eq!(board.count_occupied(), 0);
        assert_eq!(board.column_heights(), [0; BOARD_COLS]);
        assert!(board.complete_rows().is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let board = BitBoard::EMPTY;
        assert!(board.is_blocked(-1, 0));
        assert!(board.is_blocked(0, -1));
        assert!(board.is_blocked(20, 0));
        assert!(board.is_blocked(0, 10));
        assert!(!board.is_blocked(19, 9));
    }

    #[test]
    fn test_from_ascii_aligns_to_bottom() {
        let board = BitBoard::from_ascii(
            r"
            #.........
            ##########
            ",
        );
        assert!(board.is_occupied(18, 0));
        assert!(!board.is_occupied(18, 1));
        assert!(board.is_row_complete(19));
        assert_eq!(board.count_occupied(), 11);
    }

    #[test]
    fn test_column_heights() {
        let board = BitBoard::from_ascii(
            r"
            ....#.....
            .#..#.....
            .#..#....#
            ",
        );
        assert_eq!(board.column_heights(), [0, 2, 0, 0, 3, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_column_height_counts_from_topmost_block() {
        // holes below the topmost block do not lower the height
        let board = BitBoard::from_ascii(
            r"
            #.........
            ..........
            #.........
            ",
        );
        assert_eq!(board.column_heights()[0], 3);
    }

    #[test]
    fn test_with_piece_is_pure() {
        let board = BitBoard::EMPTY;
        let piece = Piece::with_origin(
            PieceKind::T,
            PieceRotation::default(),
            PiecePosition::new(18, 0),
        );
        let placed = board.with_piece(&piece);
        assert_eq!(board, BitBoard::EMPTY);
        assert_eq!(placed.count_occupied(), 4);
        for (row, col) in piece.cells() {
            assert!(placed.is_blocked(row, col));
        }
    }

    #[test]
    fn test_collides_with_blocks_and_walls() {
        let board = BitBoard::from_ascii(
            r"
            .#........
            ",
        );
        let piece = Piece::with_origin(
            PieceKind::O,
            PieceRotation::default(),
            PiecePosition::new(18, -1),
        );
        // O occupies cols 0-1 of rows 18-19; (19,1) is filled
        assert!(board.collides(&piece));
        assert!(!BitBoard::EMPTY.collides(&piece));
        assert!(BitBoard::EMPTY.collides(&piece.left()));
        assert!(BitBoard::EMPTY.collides(&piece.down()));
    }

    #[test]
    fn test_clear_single_bottom_line() {
        let mut board = BitBoard::from_ascii(
            r"
            #.........
            .#........
            ##########
            ",
        );
        assert_eq!(board.complete_rows().as_slice(), &[19]);
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(
            board,
            BitBoard::from_ascii(
                r"
                #.........
                .#........
                "
            )
        );
        assert_eq!(board.rows[0], 0);
    }

    #[test]
    fn test_clear_non_adjacent_lines() {
        let mut board = BitBoard::from_ascii(
            r"
            ##########
            #.........
            ##########
            .#........
            ",
        );
        assert_eq!(board.complete_rows().as_slice(), &[18, 16]);
        assert_eq!(board.clear_lines(), 2);
        assert_eq!(
            board,
            BitBoard::from_ascii(
                r"
                #.........
                .#........
                "
            )
        );
    }

    #[test]
    fn test_complete_rows_capped_at_four() {
        let board = BitBoard::from_ascii(
            r"
            ##########
            ##########
            ##########
            ##########
            ##########
            ",
        );
        assert_eq!(board.complete_rows().as_slice(), &[19, 18, 17, 16]);
    }

    #[test]
    fn test_display() {
        let board = BitBoard::from_ascii(
            r"
            #........#
            ",
        );
        let text = board.to_string();
        assert_eq!(text.lines().count(), BOARD_ROWS);
        assert_eq!(text.lines().last(), Some("#........#"));
    }

    #[test]
    fn test_serialization() {
        let board = BitBoard::from_ascii(
            r"
            ##........
            ##########
            ",
        );
        let serialized = serde_json::to_string(&board).unwrap();
        assert!(serialized.contains("0003"));
        assert!(serialized.contains("03ff"));
        assert_eq!(serialized.len(), BOARD_ROWS * 4 + (BOARD_ROWS - 1) + 2);

        let deserialized: BitBoard = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
    }

    #[test]
    fn test_deserialize_rejects_out_of_board_bits() {
        let mut parts = vec!["0000"; BOARD_ROWS];
        parts[0] = "0400";
        let json = format!("\"{}\"", parts.join(","));
        assert!(serde_json::from_str::<BitBoard>(&json).is_err());
    }
}
