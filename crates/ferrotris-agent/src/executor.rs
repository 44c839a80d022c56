//! Turns a [`Decision`] into one [`Intent`] per tick.

use ferrotris_engine::{Intent, Piece, PieceKind, PieceRotation};

use crate::search::Decision;

/// Average height above which the executor stops soft dropping.
pub const IDLE_AVERAGE_HEIGHT: f32 = 12.0;

/// Maximum height above which a vertical I next to the left wall falls by gravity.
pub const TALL_BOARD_HEIGHT: u8 = 10;

/// Target columns up to this one count as "next to the left wall".
pub const WALL_COLUMN: i32 = 1;

/// I pieces aimed left of this column rotate counterclockwise.
pub const I_CCW_COLUMN: i32 = 5;

/// Where the current piece should go, and how to approach it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub kind: PieceKind,
    pub rotation: PieceRotation,
    pub column: i32,
    /// Let gravity take the piece down once aligned instead of soft dropping.
    pub idle_when_aligned: bool,
}

impl Target {
    #[must_use]
    pub fn from_decision(decision: &Decision) -> Self {
        let kind = decision.kind();
        let rotation = decision.rotation();
        let column = decision.target_column();
        let vertical_i = kind == PieceKind::I && rotation.index() % 2 == 1;
        let idle_when_aligned = decision.metrics.average_height > IDLE_AVERAGE_HEIGHT
            || (decision.metrics.max_height > TALL_BOARD_HEIGHT
                && vertical_i
                && column <= WALL_COLUMN);
        Self {
            kind,
            rotation,
            column,
            idle_when_aligned,
        }
    }

    fn rotation_intent(&self) -> Intent {
        let counterclockwise = self.rotation.index() == 3
            || (self.kind == PieceKind::I && self.column < I_CCW_COLUMN);
        if counterclockwise {
            Intent::RotateCcw
        } else {
            Intent::RotateCw
        }
    }
}

/// Drives the live piece toward its [`Target`]: rotate, then shift, then drop.
///
/// Rotations come first because they move the leftmost column. Rotation
/// states with the same shape (a half-turned I, S or Z) count as reached.
///
/// # Example
///
/// ```
/// use ferrotris_agent::executor::{MovementExecutor, Target};
/// use ferrotris_engine::{Intent, Piece, PieceKind, PieceRotation};
///
/// let mut executor = MovementExecutor::default();
/// executor.set_target(Target {
///     kind: PieceKind::O,
///     rotation: PieceRotation::default(),
///     column: 0,
///     idle_when_aligned: false,
/// });
///
/// let piece = Piece::new(PieceKind::O);
/// assert_eq!(executor.next_intent(&piece), Intent::MoveLeft);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MovementExecutor {
    target: Option<Target>,
}

impl MovementExecutor {
    pub fn set_target(&mut self, target: Target) {
        self.target = Some(target);
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Next intent for `piece`. Idles without a target or for a piece of another kind.
    #[must_use]
    pub fn next_intent(&self, piece: &Piece) -> Intent {
        let Some(target) = self.target.filter(|t| t.kind == piece.kind()) else {
            return Intent::Idle;
        };

        let kind = piece.kind();
        if kind.normalized_offsets(piece.rotation()) != kind.normalized_offsets(target.rotation) {
            return target.rotation_intent();
        }

        let column = piece.leftmost_col();
        if column > target.column {
            Intent::MoveLeft
        } else if column < target.column {
            Intent::MoveRight
        } else if target.idle_when_aligned {
            Intent::Idle
        } else {
            Intent::SoftDrop
        }
    }
}
