use std::path::PathBuf;

use chrono::Utc;
use ferrotris_engine::PieceSeed;
use ferrotris_training::{
    fitness::evaluate_candidate,
    genetic::{GeneticParams, MutationKind, optimize},
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    command::GameArg,
    model::{ai_model::AiModel, record::GenerationRecord},
    util,
};

const DEFAULT_GENERATIONS: usize = 100;
const DEFAULT_POPULATION: usize = 10;
const DEFAULT_PARENTS_MATING: usize = 5;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    game: GameArg,
    /// Number of generations
    #[arg(long, default_value_t = DEFAULT_GENERATIONS)]
    generations: usize,
    /// Individuals per generation
    #[arg(long, default_value_t = DEFAULT_POPULATION)]
    population: usize,
    /// Parents selected for mating each generation
    #[arg(long, default_value_t = DEFAULT_PARENTS_MATING)]
    parents: usize,
    /// Per-gene mutation probability
    #[arg(long, default_value_t = 0.005)]
    mutation_probability: f64,
    /// Use gaussian mutation with this standard deviation instead of uniform [-1, 1]
    #[arg(long)]
    gaussian_sigma: Option<f32>,
    /// Optimizer seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Append one JSON line per evaluated individual to this file
    #[arg(long)]
    generation_log: Option<PathBuf>,
    /// Model name stored in the output file
    #[arg(long, default_value = "ga")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn params(&self) -> GeneticParams {
        let defaults = GeneticParams::default();
        GeneticParams {
            population_size: self.population,
            parents_mating: self.parents,
            generations: self.generations,
            mutation_probability: self.mutation_probability,
            mutation: self
                .gaussian_sigma
                .map_or(defaults.mutation, |sigma| MutationKind::Gaussian { sigma }),
            ..defaults
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = arg.params();
    params.validate()?;

    let mut rng = match arg.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let mut seed_rng = Pcg32::from_rng(&mut rng);

    let mut log_error = None;
    let population = optimize(
        params,
        &mut rng,
        |_, weights| {
            let piece_seed: PieceSeed = seed_rng.random();
            let result = evaluate_candidate(*weights, &arg.game.run_config(Some(piece_seed)));
            #[expect(clippy::cast_precision_loss)]
            let fitness = result.score as f64;
            fitness
        },
        |summary, population| {
            eprintln!(
                "Generation #{}: min {:.1} mean {:.1} max {:.1}",
                summary.generation, summary.fitness.min, summary.fitness.mean, summary.fitness.max
            );
            for (i, ind) in population.individuals().iter().enumerate() {
                eprintln!("  {i:2}: {} => {:.1}", ind.weights(), ind.fitness().unwrap_or_default());
            }
            let (Some(path), None) = (&arg.generation_log, &log_error) else {
                return;
            };
            for ind in population.individuals() {
                let record = GenerationRecord {
                    generation: summary.generation,
                    weights: *ind.weights(),
                    score: ind.fitness().unwrap_or_default(),
                };
                if let Err(e) = util::append_json_line("generation log", path, &record) {
                    log_error = Some(e);
                    break;
                }
            }
        },
    )?;
    if let Some(e) = log_error {
        return Err(e);
    }

    eprintln!("Best Individuals:");
    for (i, ind) in population.individuals().iter().take(5).enumerate() {
        eprintln!("  {i:2}: {} => {:.1}", ind.weights(), ind.fitness().unwrap_or_default());
    }

    let best = population
        .best()
        .ok_or_else(|| anyhow::anyhow!("population is empty"))?;
    let model = AiModel {
        name: arg.name.clone(),
        trained_at: Utc::now(),
        final_fitness: best.fitness().unwrap_or_default(),
        weights: *best.weights(),
    };
    util::save_json("AI model", arg.output.as_deref(), &model)?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.1}", model.final_fitness);
    eprintln!("  Weights: {}", model.weights);

    Ok(())
}
