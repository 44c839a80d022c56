//! Placement evaluation: scoring a single hypothetical placement.
//!
//! The search asks a [`PlacementEvaluator`] for a score of every node it
//! builds. Lower scores are better.
//!
//! # Linear Heuristic
//!
//! [`LinearEvaluator`] scores the board left by a placement as
//!
//! ```text
//! score = avg_height * w_height
//!       + bumpiness  * w_bumpiness
//!       + holes      * w_holes
//!       + line_bonus * w_lines
//! ```
//!
//! where `line_bonus` maps 0..=4 cleared lines to `0, 1, 2.5, 7.5, 30`.

use std::fmt;

use crate::{placement_analysis::PlacementAnalysis, weights::WeightVector};

/// Bonus for repeating the previously chosen placement. Always zero; kept as
/// an explicit hook in the score so the term is visible.
pub const PREVIOUS_PLACEMENT_BONUS: f32 = 0.0;

/// Assigns a score to a placement. Lower is better.
pub trait PlacementEvaluator: fmt::Debug {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Weighted sum of average height, bumpiness, holes and line bonus.
///
/// # Example
///
/// ```
/// use ferrotris_agent::{
///     placement::generate_placements,
///     placement_analysis::PlacementAnalysis,
///     placement_evaluator::{LinearEvaluator, PlacementEvaluator},
///     weights::WeightVector,
/// };
/// use ferrotris_engine::{BitBoard, PieceKind, PieceRotation};
///
/// let evaluator = LinearEvaluator::new(WeightVector::from_array([1.0, 0.0, 0.0, 0.0]));
/// let board = BitBoard::EMPTY;
/// let placement = generate_placements(&board, PieceKind::O, PieceRotation::default())
///     .next()
///     .unwrap();
/// let analysis = PlacementAnalysis::from_board(&board, placement);
///
/// // two columns of height 2 over ten columns
/// assert!((evaluator.evaluate_placement(&analysis) - 0.4).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEvaluator {
    weights: WeightVector,
}

impl LinearEvaluator {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }
}

impl Default for LinearEvaluator {
    fn default() -> Self {
        Self::new(WeightVector::DEFAULT)
    }
}

impl PlacementEvaluator for LinearEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        let board = analysis.board_analysis();
        let w = &self.weights;
        #[expect(clippy::cast_precision_loss)]
        let (bumpiness, holes) = (board.bumpiness() as f32, board.num_holes() as f32);
        board.average_height() * w.height
            + bumpiness * w.bumpiness
            + holes * w.holes
            + analysis.line_bonus() * w.lines
            + PREVIOUS_PLACEMENT_BONUS
    }
}
