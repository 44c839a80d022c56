//! Static data structures: pieces, shape tables and boards.

pub use self::{bit_board::*, board::*, piece::*};

pub(crate) mod bit_board;
pub(crate) mod board;
pub(crate) mod piece;

/// Number of rows on the board.
pub const BOARD_ROWS: usize = 20;
/// Number of columns on the board.
pub const BOARD_COLS: usize = 10;

/// Most rows a single lock can complete.
pub const MAX_CLEARED_LINES: usize = 4;
