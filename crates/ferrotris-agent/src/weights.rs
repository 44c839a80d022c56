//! Heuristic weight vector.

use std::{fmt, num::ParseFloatError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Coefficients of the linear placement heuristic.
///
/// Height, bumpiness and hole weights are penalties (positive means worse);
/// the line weight is normally negative so that clearing lines lowers the
/// score.
///
/// # Example
///
/// ```
/// use ferrotris_agent::weights::WeightVector;
///
/// let weights: WeightVector = "1.5, 0.5, 4, -0.25".parse().unwrap();
/// assert_eq!(weights.to_array(), [1.5, 0.5, 4.0, -0.25]);
///
/// assert!("1,2,3".parse::<WeightVector>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub height: f32,
    pub bumpiness: f32,
    pub holes: f32,
    pub lines: f32,
}

impl WeightVector {
    /// Number of weights.
    pub const LEN: usize = 4;

    /// Hand-tuned weights that play reasonably well.
    pub const DEFAULT: Self = Self {
        height: 1.392,
        bumpiness: 0.861,
        holes: 4.540,
        lines: -0.193,
    };

    #[must_use]
    pub const fn from_array([height, bumpiness, holes, lines]: [f32; Self::LEN]) -> Self {
        Self {
            height,
            bumpiness,
            holes,
            lines,
        }
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; Self::LEN] {
        [self.height, self.bumpiness, self.holes, self.lines]
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.height, self.bumpiness, self.holes, self.lines
        )
    }
}

/// A weight vector was built from the wrong number of values.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("expected {expected} weights, got {actual}")]
pub struct WeightArityError {
    pub expected: usize,
    pub actual: usize,
}

impl TryFrom<&[f32]> for WeightVector {
    type Error = WeightArityError;

    fn try_from(values: &[f32]) -> Result<Self, Self::Error> {
        let array: [f32; Self::LEN] = values.try_into().map_err(|_| WeightArityError {
            expected: Self::LEN,
            actual: values.len(),
        })?;
        Ok(Self::from_array(array))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseWeightsError {
    #[display("invalid weight: {_0}")]
    Number(ParseFloatError),
    #[display("{_0}")]
    Arity(WeightArityError),
}

impl FromStr for WeightVector {
    type Err = ParseWeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::try_from(values.as_slice())?)
    }
}
