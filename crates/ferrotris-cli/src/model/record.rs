use ferrotris_agent::weights::WeightVector;
use serde::{Deserialize, Serialize};

/// Line of the high-score file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct HighScoreRecord {
    pub score: u64,
    pub lines: u32,
    pub weights: WeightVector,
}

/// Line of the generation log, one per evaluated individual.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub weights: WeightVector,
    pub score: f64,
}
