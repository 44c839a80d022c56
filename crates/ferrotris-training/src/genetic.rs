//! Genetic algorithm over heuristic weight vectors.
//!
//! Each generation:
//!
//! 1. **Evaluate** - Every individual without a fitness plays one headless game
//! 2. **Select** - The `parents_mating` fittest individuals become parents
//!    (steady-state selection)
//! 3. **Keep** - The best `keep_parents` parents pass to the next generation
//!    unchanged, fitness included
//! 4. **Crossover** - Offspring `k` splices parents `k` and `k + 1` (cyclically)
//!    at a random gene
//! 5. **Mutate** - Each offspring gene is perturbed with a small probability
//!
//! Evaluation is sequential. The fitness function decides which piece
//! sequence each game uses.

use std::ops::Range;

use ferrotris_agent::weights::WeightVector;
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::weights;

/// How offspring genes are perturbed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MutationKind {
    /// Add a value drawn uniformly from `min..max`.
    Random { min: f32, max: f32 },
    /// Add a value drawn from `N(0, sigma)`.
    Gaussian { sigma: f32 },
}

/// Parameters of the optimizer. The defaults are a small population run for
/// 100 generations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneticParams {
    pub population_size: usize,
    pub parents_mating: usize,
    pub keep_parents: usize,
    pub generations: usize,
    /// Per-gene mutation probability.
    pub mutation_probability: f64,
    pub mutation: MutationKind,
    /// Initial genes are drawn uniformly from `init_low..init_high`.
    pub init_low: f32,
    pub init_high: f32,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population_size: 10,
            parents_mating: 5,
            keep_parents: 1,
            generations: 100,
            mutation_probability: 0.005,
            mutation: MutationKind::Random {
                min: -1.0,
                max: 1.0,
            },
            init_low: 0.0,
            init_high: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum GeneticParamsError {
    #[display("population must not be empty")]
    EmptyPopulation,
    #[display("at least one parent must mate")]
    NoParents,
    #[display("{parents} mating parents exceed population of {population}")]
    TooManyParents { parents: usize, population: usize },
    #[display("cannot keep {keep} of {parents} mating parents")]
    TooManyKeptParents { keep: usize, parents: usize },
    #[display("mutation probability {probability} is outside [0, 1]")]
    MutationProbability { probability: f64 },
    #[display("empty range {low}..{high}")]
    EmptyRange { low: f32, high: f32 },
    #[display("invalid gaussian sigma {sigma}")]
    Sigma { sigma: f32 },
}

impl GeneticParams {
    /// Checks the parameters before any game is played.
    pub fn validate(&self) -> Result<(), GeneticParamsError> {
        if self.population_size == 0 {
            return Err(GeneticParamsError::EmptyPopulation);
        }
        if self.parents_mating == 0 {
            return Err(GeneticParamsError::NoParents);
        }
        if self.parents_mating > self.population_size {
            return Err(GeneticParamsError::TooManyParents {
                parents: self.parents_mating,
                population: self.population_size,
            });
        }
        if self.keep_parents > self.parents_mating {
            return Err(GeneticParamsError::TooManyKeptParents {
                keep: self.keep_parents,
                parents: self.parents_mating,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(GeneticParamsError::MutationProbability {
                probability: self.mutation_probability,
            });
        }
        check_range(self.init_low, self.init_high)?;
        Mutation::new(self.mutation)?;
        Ok(())
    }
}

fn check_range(low: f32, high: f32) -> Result<Range<f32>, GeneticParamsError> {
    if low < high && low.is_finite() && high.is_finite() {
        Ok(low..high)
    } else {
        Err(GeneticParamsError::EmptyRange { low, high })
    }
}

#[derive(Debug, Clone)]
enum Mutation {
    Random(Range<f32>),
    Gaussian(Normal<f32>),
}

impl Mutation {
    fn new(kind: MutationKind) -> Result<Self, GeneticParamsError> {
        match kind {
            MutationKind::Random { min, max } => check_range(min, max).map(Self::Random),
            MutationKind::Gaussian { sigma } => Normal::new(0.0, sigma)
                .map(Self::Gaussian)
                .map_err(|_| GeneticParamsError::Sigma { sigma }),
        }
    }

    fn apply<R>(&self, weights: &mut WeightVector, probability: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Random(range) => weights::mutate_random(weights, probability, range.clone(), rng),
            Self::Gaussian(normal) => weights::mutate_gaussian(weights, probability, normal, rng),
        }
    }
}

/// A candidate weight vector and, once played, its fitness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    weights: WeightVector,
    fitness: Option<f64>,
}

impl Individual {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self {
            weights,
            fitness: None,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    /// `None` until the individual has been evaluated.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}

/// Min, mean and max fitness of an evaluated population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitnessSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// One generation of individuals, sorted best first once evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    pub fn random<R>(size: usize, range: Range<f32>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..size)
            .map(|_| Individual::new(weights::random(rng, range.clone())))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Best individual, after [`evaluate_fitness`](Self::evaluate_fitness).
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Evaluates every individual that has no fitness yet, in order, then sorts
    /// by fitness descending. Equal fitness keeps the previous order.
    pub fn evaluate_fitness<F>(&mut self, mut fitness: F)
    where
        F: FnMut(&WeightVector) -> f64,
    {
        for ind in &mut self.individuals {
            if ind.fitness.is_none() {
                ind.fitness = Some(fitness(&ind.weights));
            }
        }
        self.individuals.sort_by(|a, b| {
            let a = a.fitness.unwrap_or(f64::NEG_INFINITY);
            let b = b.fitness.unwrap_or(f64::NEG_INFINITY);
            b.total_cmp(&a)
        });
    }

    #[must_use]
    pub fn fitness_summary(&self) -> Option<FitnessSummary> {
        let values: Vec<f64> = self.individuals.iter().filter_map(|i| i.fitness).collect();
        if values.is_empty() {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(FitnessSummary {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            mean,
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

/// Builds the next generation from an evaluated population.
#[derive(Debug, Clone)]
pub struct PopulationEvolver {
    params: GeneticParams,
    mutation: Mutation,
}

impl PopulationEvolver {
    pub fn new(params: GeneticParams) -> Result<Self, GeneticParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            mutation: Mutation::new(params.mutation)?,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    /// Random initial population from the configured range.
    pub fn initial_population<R>(&self, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        Population::random(
            self.params.population_size,
            self.params.init_low..self.params.init_high,
            rng,
        )
    }

    /// `population` must be sorted best first, as left by
    /// [`Population::evaluate_fitness`].
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let params = &self.params;
        let parents = &population.individuals[..params.parents_mating.min(population.individuals.len())];
        if parents.is_empty() {
            return population.clone();
        }

        let mut next: Vec<Individual> = parents[..params.keep_parents.min(parents.len())].to_vec();
        let mut k = 0;
        while next.len() < params.population_size {
            let p1 = &parents[k % parents.len()];
            let p2 = &parents[(k + 1) % parents.len()];
            let mut child = weights::single_point_crossover(&p1.weights, &p2.weights, rng);
            self.mutation.apply(&mut child, params.mutation_probability, rng);
            next.push(Individual::new(child));
            k += 1;
        }
        Population { individuals: next }
    }
}

/// Per-generation report passed to the caller of [`optimize`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub generation: usize,
    pub fitness: FitnessSummary,
    pub best_weights: WeightVector,
}

/// Runs the whole optimization and returns the final, evaluated population.
///
/// `fitness` receives the generation number and the weights to play.
/// `on_generation` sees each evaluated generation, best individual first.
pub fn optimize<R, F, G>(
    params: GeneticParams,
    rng: &mut R,
    mut fitness: F,
    mut on_generation: G,
) -> Result<Population, GeneticParamsError>
where
    R: Rng + ?Sized,
    F: FnMut(usize, &WeightVector) -> f64,
    G: FnMut(&GenerationSummary, &Population),
{
    let evolver = PopulationEvolver::new(params)?;
    let mut population = evolver.initial_population(rng);
    for generation in 0..params.generations.max(1) {
        if generation > 0 {
            population = evolver.evolve(&population, rng);
        }
        population.evaluate_fitness(|w| fitness(generation, w));

        let (Some(summary), Some(best)) = (population.fitness_summary(), population.best()) else {
            continue;
        };
        let report = GenerationSummary {
            generation,
            fitness: summary,
            best_weights: best.weights,
        };
        log::info!(
            "generation {generation}: fitness min {:.1} mean {:.1} max {:.1}, best {}",
            summary.min,
            summary.mean,
            summary.max,
            best.weights
        );
        on_generation(&report, &population);
    }
    Ok(population)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    // prefers weights close to the defaults
    fn closeness(w: &WeightVector) -> f64 {
        let distance: f32 = w
            .to_array()
            .iter()
            .zip(WeightVector::DEFAULT.to_array())
            .map(|(a, b)| (a - b).abs())
            .sum();
        -f64::from(distance)
    }

    #[test]
    fn test_validate() {
        assert_eq!(GeneticParams::default().validate(), Ok(()));

        let bad = |f: fn(&mut GeneticParams)| {
            let mut p = GeneticParams::default();
            f(&mut p);
            p.validate().unwrap_err()
        };
        assert_eq!(bad(|p| p.population_size = 0), GeneticParamsError::EmptyPopulation);
        assert_eq!(bad(|p| p.parents_mating = 0), GeneticParamsError::NoParents);
        assert_eq!(
            bad(|p| p.parents_mating = 11),
            GeneticParamsError::TooManyParents {
                parents: 11,
                population: 10
            }
        );
        assert_eq!(
            bad(|p| p.keep_parents = 6),
            GeneticParamsError::TooManyKeptParents { keep: 6, parents: 5 }
        );
        assert!(matches!(
            bad(|p| p.mutation_probability = 1.5),
            GeneticParamsError::MutationProbability { .. }
        ));
        assert!(matches!(bad(|p| p.init_high = 0.0), GeneticParamsError::EmptyRange { .. }));
        assert!(matches!(
            bad(|p| p.mutation = MutationKind::Gaussian { sigma: -1.0 }),
            GeneticParamsError::Sigma { .. }
        ));
    }

    #[test]
    fn test_params_json() {
        let json = serde_json::to_value(GeneticParams::default()).unwrap();
        assert_eq!(
            json["mutation"],
            serde_json::json!({"kind": "random", "min": -1.0, "max": 1.0})
        );
        let back: GeneticParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, GeneticParams::default());
    }

    #[test]
    fn test_evaluate_sorts_best_first() {
        let mut population = Population::from_individuals(
            [1.0, 3.0, 2.0]
                .map(|h| Individual::new(WeightVector::from_array([h, 0.0, 0.0, 0.0])))
                .to_vec(),
        );
        let mut calls = 0;
        population.evaluate_fitness(|w| {
            calls += 1;
            f64::from(w.height)
        });
        assert_eq!(calls, 3);
        let order: Vec<_> = population.individuals().iter().map(|i| i.fitness()).collect();
        assert_eq!(order, [Some(3.0), Some(2.0), Some(1.0)]);

        // already evaluated individuals are not played again
        population.evaluate_fitness(|_| unreachable!());

        let summary = population.fitness_summary().unwrap();
        assert!((summary.mean - 2.0).abs() < 1e-9);
        assert!((summary.min - 1.0).abs() < 1e-9);
        assert!((summary.max - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_evolve_keeps_best_parent() {
        let mut rng = Pcg32::seed_from_u64(7);
        let evolver = PopulationEvolver::new(GeneticParams::default()).unwrap();
        let mut population = evolver.initial_population(&mut rng);
        population.evaluate_fitness(closeness);
        let best = population.best().unwrap().clone();

        let next = evolver.evolve(&population, &mut rng);
        assert_eq!(next.individuals().len(), 10);
        assert_eq!(next.individuals()[0], best);
        assert!(next.individuals()[1..].iter().all(|i| i.fitness().is_none()));
    }

    #[test]
    fn test_offspring_genes_come_from_parents_without_mutation() {
        let mut rng = Pcg32::seed_from_u64(11);
        let params = GeneticParams {
            mutation_probability: 0.0,
            ..GeneticParams::default()
        };
        let evolver = PopulationEvolver::new(params).unwrap();
        let mut population = evolver.initial_population(&mut rng);
        population.evaluate_fitness(closeness);
        let parents = &population.individuals()[..5];

        let next = evolver.evolve(&population, &mut rng);
        for child in next.individuals() {
            for (i, gene) in child.weights().to_array().iter().enumerate() {
                assert!(parents.iter().any(|p| p.weights().to_array()[i] == *gene));
            }
        }
    }

    #[test]
    fn test_optimize_never_loses_best_fitness() {
        let mut rng = Pcg32::seed_from_u64(3);
        let params = GeneticParams {
            generations: 30,
            mutation_probability: 0.2,
            ..GeneticParams::default()
        };
        let mut best = Vec::new();
        let population = optimize(
            params,
            &mut rng,
            |_, w| closeness(w),
            |summary, _| best.push(summary.fitness.max),
        )
        .unwrap();
        assert_eq!(best.len(), 30);
        assert!(best.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(population.individuals().len(), 10);
    }

    #[test]
    fn test_optimize_rejects_bad_params_before_playing() {
        let mut rng = Pcg32::seed_from_u64(0);
        let params = GeneticParams {
            keep_parents: 9,
            ..GeneticParams::default()
        };
        let result = optimize(params, &mut rng, |_, _| unreachable!(), |_, _| {});
        assert!(result.is_err());
    }
}
