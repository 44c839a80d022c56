//! Text rendering of a chosen placement for logs.

use ferrotris_engine::{BOARD_COLS, BOARD_ROWS, BitBoard, Piece};

/// Renders `board` with `piece` drawn on top.
///
/// Board blocks are `#`, the piece is `@`, empty cells are `.`. Rows above the
/// highest block of either are left out, so the preview stays short.
///
/// ```
/// use ferrotris_agent::preview::render_preview;
/// use ferrotris_engine::{BitBoard, Piece, PieceKind, PieceRotation};
///
/// let board = BitBoard::from_ascii("##########");
/// let piece = Piece::from_anchor(PieceKind::O, PieceRotation::default(), 17, 0);
/// assert_eq!(
///     render_preview(&board, &piece),
///     "|@@........|\n|@@........|\n|##########|\n+----------+\n",
/// );
/// ```
#[must_use]
pub fn render_preview(board: &BitBoard, piece: &Piece) -> String {
    let mut cells = [[b'.'; BOARD_COLS]; BOARD_ROWS];
    for (row, bits) in board.rows().enumerate() {
        for (col, cell) in cells[row].iter_mut().enumerate() {
            if bits & (1 << col) != 0 {
                *cell = b'#';
            }
        }
    }
    for (row, col) in piece.cells() {
        let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
            continue;
        };
        if let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = b'@';
        }
    }

    let top = cells
        .iter()
        .position(|row| row.iter().any(|&c| c != b'.'))
        .unwrap_or(BOARD_ROWS);
    let mut out = String::new();
    for row in &cells[top..] {
        out.push('|');
        out.extend(row.iter().map(|&c| char::from(c)));
        out.push_str("|\n");
    }
    out.push('+');
    out.push_str(&"-".repeat(BOARD_COLS));
    out.push_str("+\n");
    out
}

#[cfg(test)]
mod tests {
    use ferrotris_engine::{PieceKind, PieceRotation};

    use super::*;

    #[test]
    fn test_empty_board_shows_only_floor() {
        let piece = Piece::from_anchor(PieceKind::I, PieceRotation::default(), -1, 0);
        assert_eq!(render_preview(&BitBoard::EMPTY, &piece), "+----------+\n");
    }

    #[test]
    fn test_piece_over_blocks() {
        let board = BitBoard::from_ascii(
            r"
            #.........
            ##.#######
            ",
        );
        let piece = Piece::from_anchor(PieceKind::I, PieceRotation::from_index(1), 16, 2);
        let preview = render_preview(&board, &piece);
        let lines: Vec<_> = preview.lines().collect();
        assert_eq!(
            lines,
            [
                "|..@.......|",
                "|..@.......|",
                "|#.@.......|",
                "|##@#######|",
                "+----------+",
            ]
        );
    }
}
