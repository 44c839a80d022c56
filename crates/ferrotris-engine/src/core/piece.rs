use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::{BOARD_COLS, BOARD_ROWS};

/// Block offset `(row, col)` relative to a piece origin.
pub type CellOffset = (i8, i8);

/// A falling-block piece (tetromino) with origin, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s and
/// leave collision checking to the board.
///
/// # Coordinate System
///
/// - Row 0 is the top of the board and rows grow downward
/// - Column 0 is the leftmost column
/// - The absolute position of each block is `origin + SHAPES[kind][rotation]`
///
/// # Example
///
/// ```
/// use ferrotris_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.shifted(0, 1);
/// let rotated = moved.rotated_right();
/// assert_eq!(rotated.rotation().index(), 1);
/// assert_eq!(rotated.cells().count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    origin: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece in its spawn orientation at the spawn origin.
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            origin: PiecePosition::SPAWN_ORIGIN,
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub const fn with_origin(kind: PieceKind, rotation: PieceRotation, origin: PiecePosition) -> Self {
        Self {
            origin,
            rotation,
            kind,
        }
    }

    /// Creates a piece whose bounding box has its top-left corner at `(row, col)`.
    ///
    /// ```
    /// use ferrotris_engine::{Piece, PieceKind, PieceRotation};
    ///
    /// let piece = Piece::from_anchor(PieceKind::I, PieceRotation::from_index(1), 16, 9);
    /// let cells: Vec<_> = piece.cells().collect();
    /// assert_eq!(cells, vec![(16, 9), (17, 9), (18, 9), (19, 9)]);
    /// assert_eq!(piece.anchor(), (16, 9));
    /// ```
    #[must_use]
    pub fn from_anchor(kind: PieceKind, rotation: PieceRotation, row: i8, col: i8) -> Self {
        let (min_row, min_col) = kind.bounding_offset(rotation);
        Self::with_origin(
            kind,
            rotation,
            PiecePosition::new(row - min_row, col - min_col),
        )
    }

    /// Top-left corner `(row, col)` of the piece's bounding box.
    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        let (min_row, min_col) = self.kind.bounding_offset(self.rotation);
        (
            self.origin.row() + i32::from(min_row),
            self.origin.col() + i32::from(min_col),
        )
    }

    #[must_use]
    pub fn origin(&self) -> PiecePosition {
        self.origin
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the absolute `(row, col)` of each of the four blocks.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .offsets(self.rotation)
            .iter()
            .map(move |&(dr, dc)| {
                (
                    self.origin.row() + i32::from(dr),
                    self.origin.col() + i32::from(dc),
                )
            })
    }

    /// Column of the leftmost block.
    #[must_use]
    pub fn leftmost_col(&self) -> i32 {
        self.anchor().1
    }

    #[must_use]
    pub fn shifted(&self, drow: i8, dcol: i8) -> Self {
        Self {
            origin: self.origin.shifted(drow, dcol),
            ..*self
        }
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(0, -1)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(0, 1)
    }

    /// Rotates 90° clockwise about the origin. The O piece never rotates.
    #[must_use]
    pub fn rotated_right(&self) -> Self {
        if self.kind == PieceKind::O {
            return *self;
        }
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    /// Rotates 90° counterclockwise about the origin. The O piece never rotates.
    #[must_use]
    pub fn rotated_left(&self) -> Self {
        if self.kind == PieceKind::O {
            return *self;
        }
        Self {
            rotation: self.rotation.rotated_left(),
            ..*self
        }
    }
}

/// Origin of a piece on the board.
///
/// Signed, because a piece that tops out is raised above row 0 before it is
/// merged into the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    row: i8,
    col: i8,
}

impl PiecePosition {
    pub const SPAWN_ORIGIN: Self = Self::new(0, 3);

    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub fn row(self) -> i32 {
        i32::from(self.row)
    }

    #[must_use]
    pub fn col(self) -> i32 {
        i32::from(self.col)
    }

    #[must_use]
    pub const fn shifted(self, drow: i8, dcol: i8) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    /// Builds a rotation state from a count of clockwise quarter turns.
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Number of rotation states with distinct shapes.
    ///
    /// O has one, I/S/Z have two, T/J/L have four. Rotation states `0..count`
    /// are the canonical orientations the placement search enumerates.
    #[must_use]
    pub const fn rotation_count(self) -> u8 {
        match self {
            PieceKind::O => 1,
            PieceKind::I | PieceKind::S | PieceKind::Z => 2,
            PieceKind::T | PieceKind::J | PieceKind::L => 4,
        }
    }

    /// Block offsets relative to the piece origin for the given rotation.
    #[must_use]
    pub fn offsets(self, rotation: PieceRotation) -> &'static [CellOffset; 4] {
        &SHAPES[self as usize][rotation.as_usize()]
    }

    /// Block offsets shifted so that the minimum row and minimum column are both 0.
    #[must_use]
    pub fn normalized_offsets(self, rotation: PieceRotation) -> &'static [CellOffset; 4] {
        &NORMALIZED_SHAPES[self as usize][rotation.as_usize()]
    }

    /// Offset from the piece origin to the top-left corner of its blocks.
    #[must_use]
    pub fn bounding_offset(self, rotation: PieceRotation) -> CellOffset {
        let (row, col) = self.offsets(rotation)[0];
        let (norm_row, norm_col) = self.normalized_offsets(rotation)[0];
        (row - norm_row, col - norm_col)
    }

    /// Width in columns of the shape in the given rotation.
    #[must_use]
    pub fn width(self, rotation: PieceRotation) -> usize {
        let max_col = self
            .normalized_offsets(rotation)
            .iter()
            .map(|&(_, c)| c)
            .max()
            .unwrap_or_default();
        usize::from(max_col.unsigned_abs()) + 1
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrotris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrotris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            _ => None,
        }
    }
}

type Shape = [CellOffset; 4];

/// Block offsets per (kind, rotation state), each state a clockwise quarter
/// turn of the previous one inside the piece's bounding box.
const SHAPES: [[Shape; 4]; PieceKind::LEN] = [
    // I-piece
    [
        [(1, 0), (1, 1), (1, 2), (1, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 1), (1, 1), (2, 1), (3, 1)],
    ],
    // O-piece
    [
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (1, 2)],
    ],
    // T-piece
    [
        [(0, 1), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 1)],
        [(0, 1), (1, 0), (1, 1), (2, 1)],
    ],
    // S-piece
    [
        [(0, 1), (0, 2), (1, 0), (1, 1)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 1), (1, 2), (2, 0), (2, 1)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
    ],
    // Z-piece
    [
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(0, 2), (1, 1), (1, 2), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(0, 1), (1, 0), (1, 1), (2, 0)],
    ],
    // J-piece
    [
        [(0, 0), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (0, 2), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 0), (2, 1)],
    ],
    // L-piece
    [
        [(0, 2), (1, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (1, 2), (2, 0)],
        [(0, 0), (0, 1), (1, 1), (2, 1)],
    ],
];

const fn normalize(shape: Shape) -> Shape {
    let mut min_row = shape[0].0;
    let mut min_col = shape[0].1;
    let mut i = 1;
    while i < 4 {
        if shape[i].0 < min_row {
            min_row = shape[i].0;
        }
        if shape[i].1 < min_col {
            min_col = shape[i].1;
        }
        i += 1;
    }
    let mut normalized = shape;
    let mut i = 0;
    while i < 4 {
        normalized[i] = (shape[i].0 - min_row, shape[i].1 - min_col);
        i += 1;
    }
    normalized
}

const NORMALIZED_SHAPES: [[Shape; 4]; PieceKind::LEN] = {
    let mut shapes = SHAPES;
    let mut k = 0;
    while k < PieceKind::LEN {
        let mut r = 0;
        while r < 4 {
            shapes[k][r] = normalize(SHAPES[k][r]);
            r += 1;
        }
        k += 1;
    }
    shapes
};

const _: () = {
    // every shape must fit inside the board
    let mut k = 0;
    while k < PieceKind::LEN {
        let mut r = 0;
        while r < 4 {
            let mut i = 0;
            while i < 4 {
                let (row, col) = NORMALIZED_SHAPES[k][r][i];
                assert!((row as usize) < BOARD_ROWS && (col as usize) < BOARD_COLS);
                i += 1;
            }
            r += 1;
        }
        k += 1;
    }
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn normalized_set(kind: PieceKind, rotation: u8) -> Vec<CellOffset> {
        let mut cells = kind
            .normalized_offsets(PieceRotation::from_index(rotation))
            .to_vec();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_every_shape_has_four_distinct_blocks() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let offsets = kind.offsets(PieceRotation::from_index(r));
                let unique: HashSet<_> = offsets.iter().collect();
                assert_eq!(unique.len(), 4, "{kind} rotation {r}");
            }
        }
    }

    #[test]
    fn test_normalized_offsets_start_at_zero() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let offsets = kind.normalized_offsets(PieceRotation::from_index(r));
                assert_eq!(offsets.iter().map(|o| o.0).min(), Some(0));
                assert_eq!(offsets.iter().map(|o| o.1).min(), Some(0));
            }
        }
    }

    #[test]
    fn test_distinct_rotation_counts() {
        for kind in PieceKind::ALL {
            let distinct: HashSet<_> = (0..4).map(|r| normalized_set(kind, r)).collect();
            assert_eq!(distinct.len(), usize::from(kind.rotation_count()), "{kind}");
        }
    }

    #[test]
    fn test_two_state_pieces_repeat_after_half_turn() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(normalized_set(kind, 0), normalized_set(kind, 2));
            assert_eq!(normalized_set(kind, 1), normalized_set(kind, 3));
        }
    }

    #[test]
    fn test_widths() {
        let r0 = PieceRotation::default();
        let r1 = PieceRotation::from_index(1);
        assert_eq!(PieceKind::I.width(r0), 4);
        assert_eq!(PieceKind::I.width(r1), 1);
        assert_eq!(PieceKind::O.width(r0), 2);
        assert_eq!(PieceKind::T.width(r0), 3);
        assert_eq!(PieceKind::T.width(r1), 2);
    }

    #[test]
    fn test_anchor_matches_normalized_shape() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let rotation = PieceRotation::from_index(r);
                let piece = Piece::from_anchor(kind, rotation, 5, 2);
                assert_eq!(piece.anchor(), (5, 2));
                let mut cells: Vec<_> = piece.cells().collect();
                cells.sort_unstable();
                let mut expected: Vec<_> = kind
                    .normalized_offsets(rotation)
                    .iter()
                    .map(|&(dr, dc)| (5 + i32::from(dr), 2 + i32::from(dc)))
                    .collect();
                expected.sort_unstable();
                assert_eq!(cells, expected, "{kind} rotation {r}");
            }
        }
    }

    #[test]
    fn test_o_piece_never_rotates() {
        let piece = Piece::new(PieceKind::O);
        assert_eq!(piece.rotated_right(), piece);
        assert_eq!(piece.rotated_left(), piece);
    }

    #[test]
    fn test_rotation_keeps_origin() {
        let piece = Piece::new(PieceKind::T).shifted(5, 2);
        let rotated = piece.rotated_right();
        assert_eq!(rotated.origin(), piece.origin());
        assert_eq!(rotated.rotated_left(), piece);
    }

    #[test]
    fn test_spawn_cells() {
        let cells: Vec<_> = Piece::new(PieceKind::I).cells().collect();
        assert_eq!(cells, vec![(1, 3), (1, 4), (1, 5), (1, 6)]);
        assert_eq!(Piece::new(PieceKind::I).leftmost_col(), 3);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_uniform_distribution_covers_all_kinds() {
        use rand::SeedableRng as _;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let seen: HashSet<PieceKind> = (0..500).map(|_| rng.random()).collect();
        assert_eq!(seen.len(), PieceKind::LEN);
    }
}
