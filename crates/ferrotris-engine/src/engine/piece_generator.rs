use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// How the next piece kind is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Randomizer {
    /// Each piece is drawn independently and uniformly from the seven kinds.
    #[default]
    Uniform,
    /// Pieces come from shuffled bags holding one of each kind.
    SevenBag,
}

/// Seedable source of piece kinds.
///
/// # Example
///
/// ```
/// use ferrotris_engine::{PieceGenerator, PieceSeed, Randomizer};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut a = PieceGenerator::with_seed(Randomizer::Uniform, seed);
/// let mut b = PieceGenerator::with_seed(Randomizer::Uniform, seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.pop_next(), b.pop_next());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
    randomizer: Randomizer,
    bag: VecDeque<PieceKind>,
}

impl PieceGenerator {
    /// Creates a generator with a random seed.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_seed(randomizer, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(randomizer: Randomizer, seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            randomizer,
            bag: VecDeque::with_capacity(PieceKind::LEN),
        }
    }

    #[must_use]
    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Draws the next piece kind.
    pub fn pop_next(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => self.rng.random(),
            Randomizer::SevenBag => loop {
                if let Some(kind) = self.bag.pop_front() {
                    return kind;
                }
                let mut new_bag = PieceKind::ALL;
                new_bag.shuffle(&mut self.rng);
                self.bag.extend(new_bag);
            },
        }
    }
}

/// 128-bit seed for deterministic piece generation.
///
/// Written as 32 hex digits, both on the command line and in JSON.
///
/// # Example
///
/// ```
/// use ferrotris_engine::PieceSeed;
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let parsed: PieceSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex digits")]
pub struct ParsePieceSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}
