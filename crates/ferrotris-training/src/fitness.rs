//! Headless games used as the fitness function.

use ferrotris_agent::{agent::Agent, weights::WeightVector};
use ferrotris_engine::{Game, GameConfig, InputState};
use serde::Serialize;

/// Optional caps that end a run before game over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    pub max_pieces: Option<u32>,
    pub max_frames: Option<u64>,
}

impl RunLimits {
    fn reached(&self, game: &Game) -> bool {
        self.max_pieces
            .is_some_and(|max| game.stats().locked_pieces() >= max)
            || self.max_frames.is_some_and(|max| game.frame() >= max)
    }
}

/// Everything a headless run needs besides the weights.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub game: GameConfig,
    pub limits: RunLimits,
}

/// Outcome of one headless game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub pieces: u32,
    pub frames: u64,
    /// `false` when a [`RunLimits`] cap ended the run.
    pub topped_out: bool,
}

impl GameResult {
    #[must_use]
    pub fn from_game(game: &Game) -> Self {
        let stats = game.stats();
        Self {
            score: stats.score(),
            lines: stats.total_lines(),
            level: stats.level(),
            pieces: stats.locked_pieces(),
            frames: game.frame(),
            topped_out: game.status().is_game_over(),
        }
    }
}

/// Drives `game` with `agent` until game over or a limit is reached.
pub fn play_game(game: &mut Game, agent: &mut Agent<'_>, limits: &RunLimits) -> GameResult {
    let mut input = InputState::default();
    while !game.status().is_game_over() && !limits.reached(game) {
        agent.on_tick(game, &mut input);
        game.tick(&mut input);
    }
    GameResult::from_game(game)
}

/// Plays one full game with `weights` and reports the result.
///
/// The final score is the fitness of the weights.
///
/// # Example
///
/// ```
/// use ferrotris_agent::weights::WeightVector;
/// use ferrotris_engine::{GameConfig, PieceSeed};
/// use ferrotris_training::fitness::{RunConfig, RunLimits, evaluate_candidate};
///
/// let config = RunConfig {
///     game: GameConfig {
///         seed: Some(PieceSeed::from_bytes([1; 16])),
///         ..GameConfig::default()
///     },
///     limits: RunLimits {
///         max_pieces: Some(20),
///         max_frames: None,
///     },
/// };
/// let result = evaluate_candidate(WeightVector::DEFAULT, &config);
/// assert_eq!(result.pieces, 20);
/// assert!(!result.topped_out);
/// ```
#[must_use]
pub fn evaluate_candidate(weights: WeightVector, config: &RunConfig) -> GameResult {
    let mut game = Game::new(config.game);
    let mut agent = Agent::with_weights(weights);
    let result = play_game(&mut game, &mut agent, &config.limits);
    log::trace!(
        "weights {weights}: score {} lines {} pieces {}",
        result.score,
        result.lines,
        result.pieces
    );
    result
}
