//! Falling-block puzzle engine: pieces, boards, motion, line clears and scoring.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
