//! Placement bot for the falling-block engine.
//!
//! The agent works in three layers:
//!
//! ```text
//! Agent (once per spawn, one intent per tick)
//!     ↓ uses
//! SearchEngine (depth-2 tree over current and next piece)
//!     ↓ uses
//! PlacementEvaluator (score a single placement)
//! ```
//!
//! # Modules
//!
//! - [`board_analysis`] - Lazily computed column heights, bumpiness and holes
//! - [`placement`] - Resting placements reachable by a straight drop
//! - [`placement_analysis`] - Board left by a placement, with lines cleared
//! - [`placement_evaluator`] - The linear heuristic over a [`weights::WeightVector`]
//! - [`search`] - Arena-backed search tree and the chosen [`search::Decision`]
//! - [`executor`] - Turns a decision into rotate/move/drop intents
//! - [`agent`] - Ties search and executor to a running game
//! - [`preview`] - ASCII rendering of a decision for the debug log
//!
//! # Example
//!
//! ```
//! use ferrotris_agent::{
//!     placement_evaluator::LinearEvaluator,
//!     search::SearchEngine,
//! };
//! use ferrotris_engine::{BitBoard, GameSnapshot, GameStatus, PieceKind};
//!
//! let mut engine = SearchEngine::new(Box::new(LinearEvaluator::default()));
//! let decision = engine
//!     .search(&GameSnapshot {
//!         board: BitBoard::EMPTY,
//!         current: PieceKind::T,
//!         next: PieceKind::I,
//!         status: GameStatus::Running,
//!     })
//!     .unwrap();
//! assert!((0..10).contains(&decision.target_column()));
//! ```

pub mod agent;
pub mod board_analysis;
pub mod executor;
pub mod placement;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod preview;
pub mod search;
pub mod weights;
