//! Genetic operators over [`WeightVector`]s.
//!
//! - **Initialization**: [`random`] draws every gene uniformly
//! - **Crossover**: [`single_point_crossover`] splices two parents at one gene
//! - **Mutation**: [`mutate_random`] adds uniform noise, [`mutate_gaussian`]
//!   adds normal noise, each gene independently with a fixed probability
//!
//! Genes are not clamped or normalized: the line weight is expected to go
//! negative, and the score only depends on the ranking of placements.

use std::ops::Range;

use ferrotris_agent::weights::WeightVector;
use rand::Rng;
use rand_distr::Normal;

/// Draws every gene uniformly from `range`.
///
/// # Example
///
/// ```
/// use ferrotris_training::weights;
///
/// let mut rng = rand::rng();
/// let w = weights::random(&mut rng, 0.0..1.0);
/// assert!(w.to_array().iter().all(|g| (0.0..1.0).contains(g)));
/// ```
pub fn random<R>(rng: &mut R, range: Range<f32>) -> WeightVector
where
    R: Rng + ?Sized,
{
    WeightVector::from_array(std::array::from_fn(|_| rng.random_range(range.clone())))
}

/// Takes genes `..point` from `p1` and `point..` from `p2`, with `point`
/// drawn uniformly from `0..4`.
pub fn single_point_crossover<R>(p1: &WeightVector, p2: &WeightVector, rng: &mut R) -> WeightVector
where
    R: Rng + ?Sized,
{
    let point = rng.random_range(0..WeightVector::LEN);
    splice(p1, p2, point)
}

fn splice(p1: &WeightVector, p2: &WeightVector, point: usize) -> WeightVector {
    let (a, b) = (p1.to_array(), p2.to_array());
    WeightVector::from_array(std::array::from_fn(|i| if i < point { a[i] } else { b[i] }))
}

/// Adds a value drawn uniformly from `range` to each gene with probability `probability`.
pub fn mutate_random<R>(weights: &mut WeightVector, probability: f64, range: Range<f32>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let mut genes = weights.to_array();
    for gene in &mut genes {
        if rng.random_bool(probability) {
            *gene += rng.random_range(range.clone());
        }
    }
    *weights = WeightVector::from_array(genes);
}

/// Adds a value drawn from `normal` to each gene with probability `probability`.
pub fn mutate_gaussian<R>(weights: &mut WeightVector, probability: f64, normal: &Normal<f32>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let mut genes = weights.to_array();
    for gene in &mut genes {
        if rng.random_bool(probability) {
            *gene += rng.sample(normal);
        }
    }
    *weights = WeightVector::from_array(genes);
}
