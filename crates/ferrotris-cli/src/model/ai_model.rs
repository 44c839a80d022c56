use std::path::Path;

use chrono::{DateTime, Utc};
use ferrotris_agent::weights::WeightVector;
use serde::{Deserialize, Serialize};

use crate::util;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AiModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f64,
    pub weights: WeightVector,
}

impl AiModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("AI model", path)
    }
}
