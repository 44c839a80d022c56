//! Weight optimizer for the placement heuristic.
//!
//! Candidate weight vectors are scored by playing one headless game each and
//! taking the final score as fitness. A small genetic algorithm evolves the
//! candidates.
//!
//! ```text
//! Genetic Algorithm (genetic)
//!     ↓ evolves
//! WeightVector (individuals)
//!     ↓ used by
//! Agent + Game (fitness)
//!     ↓ produces
//! Final score
//! ```
//!
//! # Example
//!
//! ```
//! use ferrotris_engine::{GameConfig, PieceSeed};
//! use ferrotris_training::{
//!     fitness::{RunConfig, RunLimits, evaluate_candidate},
//!     genetic::{GeneticParams, optimize},
//! };
//! use rand::SeedableRng as _;
//!
//! let params = GeneticParams {
//!     population_size: 4,
//!     parents_mating: 2,
//!     generations: 2,
//!     ..GeneticParams::default()
//! };
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let population = optimize(
//!     params,
//!     &mut rng,
//!     |_, weights| {
//!         let config = RunConfig {
//!             game: GameConfig {
//!                 seed: Some(PieceSeed::from_bytes([5; 16])),
//!                 ..GameConfig::default()
//!             },
//!             limits: RunLimits {
//!                 max_pieces: Some(10),
//!                 max_frames: None,
//!             },
//!         };
//!         #[expect(clippy::cast_precision_loss)]
//!         let score = evaluate_candidate(*weights, &config).score as f64;
//!         score
//!     },
//!     |_, _| {},
//! )
//! .unwrap();
//! assert!(population.best().unwrap().fitness().is_some());
//! ```

pub mod fitness;
pub mod genetic;
pub mod weights;
