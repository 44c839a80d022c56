use ferrotris_engine::PieceSeed;
use ferrotris_training::fitness::evaluate_candidate;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::command::{GameArg, WeightsArg};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    #[clap(flatten)]
    weights: WeightsArg,
    #[clap(flatten)]
    game: GameArg,
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,
    /// Seed for the per-game piece sequences; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        weights,
        game,
        games,
        seed,
    } = arg;

    let weights = weights.resolve()?;
    let mut rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(*seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };

    let mut scores = Vec::with_capacity(*games);
    for i in 0..*games {
        let piece_seed: PieceSeed = rng.random();
        let result = evaluate_candidate(weights, &game.run_config(Some(piece_seed)));
        log::info!(
            "game {i}: score {} lines {} pieces {} (seed {piece_seed})",
            result.score,
            result.lines,
            result.pieces
        );
        scores.push(result.score);
    }

    let (Some(min), Some(max)) = (scores.iter().min(), scores.iter().max()) else {
        eprintln!("No games played");
        return Ok(());
    };
    #[expect(clippy::cast_precision_loss)]
    let mean = scores.iter().sum::<u64>() as f64 / scores.len() as f64;

    eprintln!("Evaluated {} games", scores.len());
    eprintln!("  Weights: {weights}");
    eprintln!("  Min:  {min}");
    eprintln!("  Mean: {mean:.1}");
    eprintln!("  Max:  {max}");
    Ok(())
}
