//! Lazily computed board metrics used by the placement heuristic.

use std::{cell::OnceCell, iter};

use ferrotris_engine::{BOARD_COLS, BOARD_ROWS, BitBoard};

/// Metrics of a board, each computed on first use.
///
/// # Example
///
/// ```
/// use ferrotris_agent::board_analysis::BoardAnalysis;
/// use ferrotris_engine::BitBoard;
///
/// let board = BitBoard::from_ascii(
///     r"
///     #.........
///     ..........
///     #.#.......
///     ",
/// );
/// let analysis = BoardAnalysis::from_board(&board);
/// assert_eq!(analysis.column_heights()[..3], [3, 0, 1]);
/// assert_eq!(analysis.bumpiness(), 3 + 1 + 1);
/// assert_eq!(analysis.num_holes(), 1);
/// ```
#[derive(Debug)]
pub struct BoardAnalysis {
    board: BitBoard,
    column_heights: OnceCell<[u8; BOARD_COLS]>,
    max_height: OnceCell<u8>,
    average_height: OnceCell<f32>,
    bumpiness: OnceCell<u32>,
    num_holes: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &BitBoard) -> Self {
        Self {
            board: *board,
            column_heights: OnceCell::new(),
            max_height: OnceCell::new(),
            average_height: OnceCell::new(),
            bumpiness: OnceCell::new(),
            num_holes: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; BOARD_COLS] {
        self.column_heights
            .get_or_init(|| self.board.column_heights())
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    /// Mean of the ten column heights.
    #[must_use]
    pub fn average_height(&self) -> f32 {
        *self.average_height.get_or_init(|| {
            let total: u32 = self.column_heights().iter().copied().map(u32::from).sum();
            #[expect(clippy::cast_precision_loss)]
            let avg = total as f32 / BOARD_COLS as f32;
            avg
        })
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            let h = self.column_heights();
            iter::zip(h, &h[1..])
                .map(|(&a, &b)| u32::from(a.abs_diff(b)))
                .sum()
        })
    }

    /// Empty cells lying below the topmost occupied cell of their column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            let mut holes = 0;
            for col in 0..BOARD_COLS {
                let mut covered = false;
                for row in 0..BOARD_ROWS {
                    if self.board.is_occupied(row, col) {
                        covered = true;
                    } else if covered {
                        holes += 1;
                    }
                }
            }
            holes
        })
    }
}
