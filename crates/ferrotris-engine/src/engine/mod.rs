//! Frame-driven game logic on top of the core data structures.
//!
//! - [`Game`] - Motion/collision state machine, line-clear pipeline and piece lifecycle
//! - [`InputState`] / [`Intent`] - Input channel shared by keyboard drivers and the agent
//! - [`GameStats`] - Score, level and line statistics
//! - [`PieceGenerator`] / [`PieceSeed`] - Seedable piece sequence
//! - [`GameClock`] / [`gravity_period`] - Frame timers
//!
//! # Game Flow
//!
//! 1. The first tick spawns the current piece at the top of the board
//! 2. Each tick applies held input, gravity and one-shot rotations
//! 3. A piece that cannot move down is merged, completed rows are scored
//! 4. Completed rows animate for a few frames, then are removed
//! 5. The next piece spawns; an occupied spawn area ends the game

pub use self::{clock::*, game::*, game_stats::*, input::*, piece_generator::*};

mod clock;
mod game;
mod game_stats;
mod input;
mod piece_generator;
