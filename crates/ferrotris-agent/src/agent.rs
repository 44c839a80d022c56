//! Per-tick driver that plays a [`Game`] through its [`InputState`].

use ferrotris_engine::{Game, InputState, Intent};

use crate::{
    executor::{MovementExecutor, Target},
    placement_evaluator::{LinearEvaluator, PlacementEvaluator},
    preview::render_preview,
    search::{Decision, SearchEngine},
    weights::WeightVector,
};

/// Searches once per spawned piece and feeds one intent per tick.
///
/// Call [`on_tick`](Self::on_tick) right before every [`Game::tick`], with the
/// same `InputState`.
///
/// # Example
///
/// ```
/// use ferrotris_agent::{agent::Agent, weights::WeightVector};
/// use ferrotris_engine::{Game, GameConfig, InputState, PieceSeed};
///
/// let mut game = Game::new(GameConfig {
///     seed: Some(PieceSeed::from_bytes([3; 16])),
///     ..GameConfig::default()
/// });
/// let mut input = InputState::default();
/// let mut agent = Agent::with_weights(WeightVector::DEFAULT);
///
/// while game.stats().locked_pieces() < 5 {
///     agent.on_tick(&game, &mut input);
///     game.tick(&mut input);
/// }
/// assert!(game.status().is_running());
/// ```
#[derive(Debug)]
pub struct Agent<'a> {
    search: SearchEngine<'a>,
    executor: MovementExecutor,
    /// `(restarts, spawn_count)` of the piece the target was chosen for.
    last_spawn: (u64, u64),
    decisions: u64,
}

impl Agent<'static> {
    #[must_use]
    pub fn with_weights(weights: WeightVector) -> Self {
        Self::new(Box::new(LinearEvaluator::new(weights)))
    }
}

impl<'a> Agent<'a> {
    #[must_use]
    pub fn new(evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            search: SearchEngine::new(evaluator),
            executor: MovementExecutor::default(),
            last_spawn: (0, 0),
            decisions: 0,
        }
    }

    /// Decision for the piece currently being placed.
    #[must_use]
    pub fn decision(&self) -> Option<&Decision> {
        self.search.previous()
    }

    /// Number of searches run so far.
    #[must_use]
    pub fn decisions(&self) -> u64 {
        self.decisions
    }

    /// Forgets the current target.
    ///
    /// Restarts of the driven game are detected automatically; call this when
    /// switching to a different [`Game`].
    pub fn reset(&mut self) {
        self.executor.clear();
        self.last_spawn = (0, 0);
    }

    /// Writes the intent for the coming tick into `input`.
    pub fn on_tick(&mut self, game: &Game, input: &mut InputState) {
        let piece = match game.active_piece() {
            Some(piece) if game.status().is_running() => piece,
            _ => {
                input.apply(Intent::Idle);
                return;
            }
        };

        let spawn = (game.restarts(), game.spawn_count());
        if spawn.0 != self.last_spawn.0 {
            self.reset();
        }
        if spawn != self.last_spawn {
            self.last_spawn = spawn;
            self.decide(game);
        }

        input.apply(self.executor.next_intent(piece));
    }

    fn decide(&mut self, game: &Game) {
        let snapshot = game.snapshot();
        self.decisions += 1;
        match self.search.search(&snapshot) {
            Some(decision) => {
                log::debug!(
                    "{} -> rotation {} column {} (score {:.3}, lookahead {:.3})\n{}",
                    decision.kind(),
                    decision.rotation().index(),
                    decision.target_column(),
                    decision.evaluation,
                    decision.lookahead_evaluation,
                    render_preview(&snapshot.board, decision.target_piece()),
                );
                self.executor.set_target(Target::from_decision(&decision));
            }
            None => {
                log::debug!("no placement for {}", snapshot.current);
                self.executor.clear();
            }
        }
    }
}
