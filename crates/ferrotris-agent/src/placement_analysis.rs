//! Result of applying a placement to a board snapshot.
//!
//! [`PlacementAnalysis`] merges the piece into a copy of the board, clears
//! completed rows, and keeps the cleared line count together with lazily
//! computed metrics of the resulting board.
//!
//! ```
//! use ferrotris_agent::{placement::generate_placements, placement_analysis::PlacementAnalysis};
//! use ferrotris_engine::{BitBoard, PieceKind, PieceRotation};
//!
//! let board = BitBoard::from_ascii("....######");
//! let rotation = PieceRotation::default();
//! let placement = generate_placements(&board, PieceKind::I, rotation).next().unwrap();
//!
//! let analysis = PlacementAnalysis::from_board(&board, placement);
//! assert_eq!(analysis.cleared_lines(), 1);
//! assert_eq!(analysis.board_analysis().max_height(), 0);
//! ```

use ferrotris_engine::BitBoard;

use crate::{board_analysis::BoardAnalysis, placement::Placement};

/// Completed-line bonus for clearing 0..=4 rows in one placement.
pub const LINE_BONUS: [f32; 5] = [0.0, 1.0, 2.5, 7.5, 30.0];

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    #[must_use]
    pub fn from_board(before_placement: &BitBoard, placement: Placement) -> Self {
        let mut board = before_placement.with_piece(placement.piece());
        let cleared_lines = board.clear_lines();

        Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::from_board(&board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn line_bonus(&self) -> f32 {
        LINE_BONUS[self.cleared_lines.min(LINE_BONUS.len() - 1)]
    }

    /// Metrics of the board after the placement and its line clears.
    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}

#[cfg(test)]
mod tests {
    use ferrotris_engine::{Piece, PieceKind, PieceRotation};

    use super::*;
    use crate::placement::{all_placements, generate_placements};

    fn analyze(board: &BitBoard, piece: Piece) -> PlacementAnalysis {
        let placement = all_placements(board, piece.kind())
            .find(|p| p.piece() == &piece)
            .unwrap();
        PlacementAnalysis::from_board(board, placement)
    }

    #[test]
    fn test_line_bonus_table() {
        let cases = [
            (".........#", 0, 0.0),
            ("#########.", 1, 1.0),
            ("#########.\n#########.", 2, 2.5),
            ("#########.\n#########.\n#########.", 3, 7.5),
            ("#########.\n#########.\n#########.\n#########.", 4, 30.0),
        ];
        for (art, lines, bonus) in cases {
            let board = BitBoard::from_ascii(art);
            let placement =
                generate_placements(&board, PieceKind::I, PieceRotation::from_index(1))
                    .find(|p| p.column() == 9)
                    .unwrap();
            let analysis = PlacementAnalysis::from_board(&board, placement);
            assert_eq!(analysis.cleared_lines(), lines);
            assert!((analysis.line_bonus() - bonus).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_metrics_after_clear() {
        let board = BitBoard::from_ascii(
            r"
            #.........
            ####.#####
            ",
        );
        let piece = Piece::from_anchor(PieceKind::I, PieceRotation::from_index(1), 16, 4);
        let analysis = analyze(&board, piece);
        assert_eq!(analysis.cleared_lines(), 1);
        let metrics = analysis.board_analysis();
        // column 0 block and the three I blocks above the cleared row remain
        assert_eq!(metrics.column_heights()[0], 1);
        assert_eq!(metrics.column_heights()[4], 3);
        assert_eq!(metrics.num_holes(), 0);
    }
}
