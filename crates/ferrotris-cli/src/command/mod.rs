use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ferrotris_agent::weights::WeightVector;
use ferrotris_engine::{GameConfig, PieceSeed, Randomizer};
use ferrotris_training::fitness::{RunConfig, RunLimits};

use crate::model::ai_model::AiModel;

use self::{auto_play::AutoPlayArg, evaluate::EvaluateArg, train::TrainArg};

mod auto_play;
mod evaluate;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play one headless game with the bot
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Play several games and report score statistics
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Optimize heuristic weights with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::AutoPlay(AutoPlayArg::default())) {
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
    }
    Ok(())
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum RandomizerArg {
    #[default]
    Uniform,
    Bag,
}

impl From<RandomizerArg> for Randomizer {
    fn from(arg: RandomizerArg) -> Self {
        match arg {
            RandomizerArg::Uniform => Randomizer::Uniform,
            RandomizerArg::Bag => Randomizer::SevenBag,
        }
    }
}

/// Where the heuristic weights come from.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct WeightsArg {
    /// Path to a model file (JSON format)
    #[arg(long, conflicts_with = "weights")]
    model: Option<PathBuf>,
    /// Four comma separated weights: height,bumpiness,holes,lines
    #[arg(long, allow_hyphen_values = true)]
    weights: Option<WeightVector>,
}

impl WeightsArg {
    pub(crate) fn resolve(&self) -> anyhow::Result<WeightVector> {
        if let Some(path) = &self.model {
            let model = AiModel::open(path)?;
            log::info!("loaded model {:?} ({})", model.name, model.weights);
            return Ok(model.weights);
        }
        Ok(self.weights.unwrap_or_default())
    }
}

/// Game rules and run caps shared by the playing commands.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Starting level
    #[arg(long, default_value_t = 0)]
    level: u32,
    /// Piece randomizer (uniform or bag)
    #[arg(long, default_value = "uniform")]
    randomizer: RandomizerArg,
    /// Stop after this many locked pieces
    #[arg(long)]
    max_pieces: Option<u32>,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

impl GameArg {
    pub(crate) fn run_config(&self, seed: Option<PieceSeed>) -> RunConfig {
        RunConfig {
            game: GameConfig {
                starting_level: self.level,
                randomizer: self.randomizer.into(),
                seed,
            },
            limits: RunLimits {
                max_pieces: self.max_pieces,
                max_frames: self.max_frames,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_weights_and_seed() {
        let args = CommandArgs::try_parse_from([
            "ferrotris",
            "auto-play",
            "--weights",
            "1,0.5,4,-0.25",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--randomizer",
            "bag",
        ])
        .unwrap();
        let Some(Mode::AutoPlay(arg)) = args.mode else {
            panic!("expected auto-play");
        };
        assert_eq!(
            arg.weights.resolve().unwrap(),
            WeightVector::from_array([1.0, 0.5, 4.0, -0.25])
        );
        let config = arg.game.run_config(arg.seed);
        assert_eq!(config.game.randomizer, Randomizer::SevenBag);
        assert!(config.game.seed.is_some());
    }

    #[test]
    fn test_rejects_wrong_weight_count() {
        let result = CommandArgs::try_parse_from(["ferrotris", "evaluate", "--weights", "1,2,3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_model_conflicts_with_weights() {
        let result = CommandArgs::try_parse_from([
            "ferrotris",
            "auto-play",
            "--model",
            "m.json",
            "--weights",
            "1,1,1,-1",
        ]);
        assert!(result.is_err());
    }
}
