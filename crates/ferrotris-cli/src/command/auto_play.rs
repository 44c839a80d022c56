use std::path::PathBuf;

use ferrotris_agent::agent::Agent;
use ferrotris_engine::{Game, PieceSeed};
use ferrotris_training::fitness::play_game;

use crate::{
    command::{GameArg, WeightsArg},
    model::record::HighScoreRecord,
    util,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    #[clap(flatten)]
    pub(crate) weights: WeightsArg,
    #[clap(flatten)]
    pub(crate) game: GameArg,
    /// Piece sequence seed (32 hex digits); random when omitted
    #[arg(long)]
    pub(crate) seed: Option<PieceSeed>,
    /// Append the result to this JSON lines file
    #[arg(long)]
    high_scores: Option<PathBuf>,
    /// Minimum score recorded in the high-score file
    #[arg(long, default_value_t = 0)]
    threshold: u64,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        weights,
        game,
        seed,
        high_scores,
        threshold,
    } = arg;

    let weights = weights.resolve()?;
    let config = game.run_config(*seed);
    let mut game = Game::new(config.game);
    let mut agent = Agent::with_weights(weights);
    let result = play_game(&mut game, &mut agent, &config.limits);

    println!("{}", game.board());
    eprintln!("Game finished");
    eprintln!("  Weights: {weights}");
    eprintln!("  Score:   {}", result.score);
    eprintln!("  Lines:   {}", result.lines);
    eprintln!("  Level:   {}", result.level);
    eprintln!("  Pieces:  {}", result.pieces);
    eprintln!("  Frames:  {}", result.frames);
    if !result.topped_out {
        eprintln!("  (stopped by limit)");
    }

    if let Some(path) = high_scores
        && result.score >= *threshold
    {
        let record = HighScoreRecord {
            score: result.score,
            lines: result.lines,
            weights,
        };
        util::append_json_line("high score", path, &record)?;
        eprintln!("  Recorded in {}", path.display());
    }

    Ok(())
}
