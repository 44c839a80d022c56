//! Candidate placements reachable by straight vertical descent.

use ferrotris_engine::{BOARD_COLS, BitBoard, Piece, PieceKind, PieceRotation};

/// A resting position of a piece: where it lands when dropped straight down
/// from the top of the board in a given column and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    piece: Piece,
}

impl Placement {
    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.piece.rotation()
    }

    /// Top-left `(row, col)` of the resting shape's bounding box.
    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        self.piece.anchor()
    }

    #[must_use]
    pub fn column(&self) -> i32 {
        self.piece.anchor().1
    }
}

/// Enumerates resting placements of `kind` in one rotation, leftmost column ascending.
///
/// For each leftmost column `0..=10 - width` the shape starts at row 0 and
/// moves down until one more row would hit the floor or a block. A column
/// where the shape already collides at row 0 yields nothing.
///
/// # Example
///
/// ```
/// use ferrotris_agent::placement::generate_placements;
/// use ferrotris_engine::{BitBoard, PieceKind, PieceRotation};
///
/// let placements: Vec<_> =
///     generate_placements(&BitBoard::EMPTY, PieceKind::O, PieceRotation::default()).collect();
/// assert_eq!(placements.len(), 9);
/// assert_eq!(placements[0].anchor(), (18, 0));
/// ```
pub fn generate_placements(
    board: &BitBoard,
    kind: PieceKind,
    rotation: PieceRotation,
) -> impl Iterator<Item = Placement> + '_ {
    let width = kind.width(rotation);
    (0..=BOARD_COLS - width).filter_map(move |col| {
        let col = i8::try_from(col).ok()?;
        let mut piece = Piece::from_anchor(kind, rotation, 0, col);
        if board.collides(&piece) {
            return None;
        }
        while !board.collides(&piece.down()) {
            piece = piece.down();
        }
        Some(Placement { piece })
    })
}

/// Enumerates resting placements of `kind` over its distinct rotations,
/// rotation-major then column ascending.
pub fn all_placements(board: &BitBoard, kind: PieceKind) -> impl Iterator<Item = Placement> + '_ {
    (0..kind.rotation_count())
        .flat_map(move |r| generate_placements(board, kind, PieceRotation::from_index(r)))
}
