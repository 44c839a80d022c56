use arrayvec::ArrayVec;

use crate::core::{BitBoard, Board, MAX_CLEARED_LINES, Piece, PieceKind};

use super::{
    GameStats,
    clock::{CLEAR_ANIMATION_PERIOD, CLEAR_ANIMATION_STAGES, GameClock},
    input::{InputState, Rotation},
    piece_generator::{PieceGenerator, PieceSeed, Randomizer},
};

/// Most times the spawn origin is raised when the spawn cells are occupied.
const MAX_SPAWN_RAISES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    Running,
    Paused,
    GameOver,
}

/// Lifecycle of the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PieceStatus {
    /// Waiting to spawn on the next tick.
    Uncreated,
    /// Falling and accepting input.
    Moving,
    /// Landed; merged into the board on the same tick.
    Collided,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub starting_level: u32,
    pub randomizer: Randomizer,
    /// Seed for the piece sequence; random when `None`.
    pub seed: Option<PieceSeed>,
}

/// Completed rows being animated before they are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearAnimation {
    rows: ArrayVec<usize, MAX_CLEARED_LINES>,
    started_at: u64,
}

impl ClearAnimation {
    /// Completed rows, bottom first.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Animation stage at `frame`; the rows are removed once it reaches
    /// [`CLEAR_ANIMATION_STAGES`].
    #[must_use]
    pub fn stage(&self, frame: u64) -> u32 {
        let stage = frame.saturating_sub(self.started_at) / u64::from(CLEAR_ANIMATION_PERIOD);
        u32::try_from(stage).unwrap_or(u32::MAX)
    }

    fn is_finished(&self, frame: u64) -> bool {
        self.stage(frame) >= CLEAR_ANIMATION_STAGES
    }
}

/// What happened during one call to [`Game::tick`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// A new piece entered the board.
    pub spawned: bool,
    /// The active piece was merged into the board and scored.
    pub locked: bool,
    /// Rows completed by the lock.
    pub cleared_lines: usize,
    /// The game is over (set on the topping-out tick and every tick after).
    pub game_over: bool,
}

/// Immutable view handed to the placement search once per spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: BitBoard,
    pub current: PieceKind,
    pub next: PieceKind,
    pub status: GameStatus,
}

/// Frame-driven falling-block game.
///
/// Each [`tick`](Self::tick) is one frame. The driver owns an [`InputState`]
/// and passes it in every tick, so a keyboard layer and the placement agent
/// drive the game the same way.
///
/// # Example
///
/// ```
/// use ferrotris_engine::{Game, GameConfig, InputState, Intent};
///
/// let mut game = Game::new(GameConfig::default());
/// let mut input = InputState::default();
///
/// let report = game.tick(&mut input);
/// assert!(report.spawned);
///
/// input.apply(Intent::HardDrop);
/// let report = game.tick(&mut input);
/// assert!(report.locked);
/// assert_eq!(game.stats().locked_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    occupancy: BitBoard,
    generator: PieceGenerator,
    current: PieceKind,
    next: PieceKind,
    piece: Piece,
    piece_status: PieceStatus,
    status: GameStatus,
    stats: GameStats,
    clock: GameClock,
    drop_score: u32,
    clearing: Option<ClearAnimation>,
    spawn_count: u64,
    restarts: u64,
}

impl Game {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut generator = match config.seed {
            Some(seed) => PieceGenerator::with_seed(config.randomizer, seed),
            None => PieceGenerator::new(config.randomizer),
        };
        let current = generator.pop_next();
        let next = generator.pop_next();
        Self {
            config,
            board: Board::new(),
            occupancy: BitBoard::EMPTY,
            generator,
            current,
            next,
            piece: Piece::new(current),
            piece_status: PieceStatus::Uncreated,
            status: GameStatus::Running,
            stats: GameStats::new(config.starting_level),
            clock: GameClock::new(config.starting_level),
            drop_score: 0,
            clearing: None,
            spawn_count: 0,
            restarts: 0,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn piece_status(&self) -> PieceStatus {
        self.piece_status
    }

    /// The falling piece, while it is [`PieceStatus::Moving`].
    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.piece_status.is_moving().then_some(&self.piece)
    }

    /// Kind of the piece that is falling or about to spawn.
    #[must_use]
    pub fn current_kind(&self) -> PieceKind {
        self.current
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Number of pieces spawned since the game (re)started.
    #[must_use]
    pub fn spawn_count(&self) -> u64 {
        self.spawn_count
    }

    /// Number of times [`restart`](Self::restart) has been called.
    ///
    /// Together with [`spawn_count`](Self::spawn_count) this identifies the
    /// active piece across restarts.
    #[must_use]
    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    /// Rows currently being cleared, if a clear animation is running.
    #[must_use]
    pub fn clear_animation(&self) -> Option<&ClearAnimation> {
        self.clearing.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.occupancy,
            current: self.current,
            next: self.next,
            status: self.status,
        }
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::GameOver => GameStatus::GameOver,
        };
    }

    /// Starts a new game with the same configuration, continuing the piece sequence.
    pub fn restart(&mut self) {
        self.current = self.generator.pop_next();
        self.next = self.generator.pop_next();
        self.board = Board::new();
        self.occupancy = BitBoard::EMPTY;
        self.piece = Piece::new(self.current);
        self.piece_status = PieceStatus::Uncreated;
        self.status = GameStatus::Running;
        self.stats = GameStats::new(self.config.starting_level);
        self.clock = GameClock::new(self.config.starting_level);
        self.drop_score = 0;
        self.clearing = None;
        self.spawn_count = 0;
        self.restarts += 1;
    }

    /// Advances the game by one frame.
    pub fn tick(&mut self, input: &mut InputState) -> TickReport {
        let mut report = TickReport::default();
        if input.take_restart() {
            self.restart();
        }

        match self.status {
            GameStatus::GameOver => {
                report.game_over = true;
                return report;
            }
            GameStatus::Paused => {
                if input.take_pause() {
                    self.toggle_pause();
                }
                return report;
            }
            GameStatus::Running => {}
        }

        match self.piece_status {
            PieceStatus::Uncreated => {
                self.spawn();
                report.spawned = true;
            }
            PieceStatus::Moving => self.move_piece(input),
            PieceStatus::Collided => {}
        }

        if input.take_pause() {
            self.toggle_pause();
        }

        if self.status.is_game_over() {
            report.game_over = true;
        } else {
            match self.piece_status {
                PieceStatus::Moving => {
                    if let Some(rotation) = input.take_rotation() {
                        self.rotate(rotation);
                    }
                }
                PieceStatus::Collided => self.settle(&mut report),
                PieceStatus::Uncreated => {}
            }
        }

        self.clock.advance();
        report
    }

    fn spawn(&mut self) {
        self.drop_score = 0;
        self.spawn_count += 1;

        let mut piece = Piece::new(self.current);
        let mut topped_out = false;
        for _ in 0..MAX_SPAWN_RAISES {
            if !self.spawn_overlaps(&piece) {
                break;
            }
            topped_out = true;
            piece = piece.shifted(-1, 0);
        }
        self.piece = piece;

        if topped_out {
            log::debug!("{} topped out after {} pieces", self.current, self.spawn_count);
            self.piece_status = PieceStatus::Collided;
            self.status = GameStatus::GameOver;
            self.board.lock_piece(&piece);
            self.occupancy = self.board.to_bit_board();
        } else {
            self.piece_status = PieceStatus::Moving;
        }
    }

    // only blocks inside the grid can overlap
    fn spawn_overlaps(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .any(|(row, col)| match (usize::try_from(row), usize::try_from(col)) {
                (Ok(row), Ok(col)) => self.occupancy.is_occupied(row, col),
                _ => false,
            })
    }

    fn move_piece(&mut self, input: &mut InputState) {
        let frame = self.clock.frame();
        let board = self.occupancy;

        if input.take_hard_drop() {
            while !board.collides(&self.piece.down()) {
                self.piece = self.piece.down();
                self.drop_score += 1;
            }
            self.piece_status = PieceStatus::Collided;
            return;
        }

        let dx = input.horizontal().delta();
        if input.soft_drop() {
            let down = self.piece.down();
            if board.collides(&down) {
                self.piece_status = PieceStatus::Collided;
                return;
            }
            let diagonal = self.piece.shifted(1, dx);
            let candidate = if dx != 0 && !board.collides(&diagonal) {
                diagonal
            } else {
                down
            };
            if self.clock.movement.check(frame) {
                self.drop_score += 1;
                self.piece = candidate;
            }
            return;
        }

        let lateral = self.piece.shifted(0, dx);
        if self.clock.movement.check(frame) && dx != 0 && !board.collides(&lateral) {
            self.piece = lateral;
        }
        if self.clock.fall.check(frame) {
            let down = self.piece.down();
            if board.collides(&down) {
                self.piece_status = PieceStatus::Collided;
            } else {
                self.piece = down;
            }
        }
    }

    fn rotate(&mut self, rotation: Rotation) {
        let candidate = match rotation {
            Rotation::Clockwise => self.piece.rotated_right(),
            Rotation::CounterClockwise => self.piece.rotated_left(),
        };
        if !self.occupancy.collides(&candidate) {
            self.piece = candidate;
        }
    }

    fn settle(&mut self, report: &mut TickReport) {
        match &self.clearing {
            None => self.lock(report),
            Some(animation) if animation.is_finished(self.clock.frame()) => {
                self.board.remove_rows(animation.rows());
                self.occupancy = self.board.to_bit_board();
                self.clearing = None;
                self.prepare_next_spawn();
            }
            Some(_) => {}
        }
    }

    fn lock(&mut self, report: &mut TickReport) {
        self.board.lock_piece(&self.piece);
        self.occupancy = self.board.to_bit_board();

        let rows = self.board.complete_rows();
        self.stats.lock_piece(rows.len(), self.drop_score);
        self.clock.set_level(self.stats.level());
        report.locked = true;
        report.cleared_lines = rows.len();

        if rows.is_empty() {
            self.prepare_next_spawn();
        } else {
            log::trace!("clearing rows {rows:?} at frame {}", self.clock.frame());
            self.clearing = Some(ClearAnimation {
                rows,
                started_at: self.clock.frame(),
            });
        }
    }

    fn prepare_next_spawn(&mut self) {
        self.current = self.next;
        self.next = self.generator.pop_next();
        self.piece_status = PieceStatus::Uncreated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Cell, PiecePosition, PieceRotation},
        engine::input::{Horizontal, Intent},
    };

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn game_with(current: PieceKind, board: &str) -> Game {
        let mut game = Game::new(GameConfig {
            seed: Some(SEED),
            ..GameConfig::default()
        });
        game.current = current;
        game.board = Board::from_ascii(board);
        game.occupancy = game.board.to_bit_board();
        game
    }

    /// Lays out the given rows from the top, padding the rest with empty rows.
    fn top_board(rows: &[&str]) -> String {
        let mut art = rows.join("\n");
        for _ in rows.len()..20 {
            art.push_str("\n..........");
        }
        art
    }

    fn origin(game: &Game) -> PiecePosition {
        game.active_piece().unwrap().origin()
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut game = game_with(PieceKind::T, "");
        let mut input = InputState::default();
        assert!(game.piece_status().is_uncreated());

        let report = game.tick(&mut input);
        assert!(report.spawned);
        assert_eq!(game.spawn_count(), 1);
        assert_eq!(origin(&game), PiecePosition::SPAWN_ORIGIN);
        assert_eq!(game.frame(), 1);
    }

    #[test]
    fn test_gravity_at_level_zero() {
        let mut game = game_with(PieceKind::T, "");
        let mut input = InputState::default();
        for _ in 0..48 {
            game.tick(&mut input);
        }
        assert_eq!(origin(&game).row(), 0);
        game.tick(&mut input);
        assert_eq!(origin(&game).row(), 1);
    }

    #[test]
    fn test_lateral_move_repeats_every_move_period() {
        let mut game = game_with(PieceKind::O, "");
        let mut input = InputState::default();
        game.tick(&mut input);
        input.apply(Intent::MoveLeft);
        // frames 1..=8 fire the movement timer at 4 and 8
        for _ in 0..8 {
            game.tick(&mut input);
        }
        assert_eq!(origin(&game).col(), 1);
        for _ in 0..8 {
            game.tick(&mut input);
        }
        // the O piece's leftmost block is at origin + 1
        assert_eq!(origin(&game).col(), -1);
        assert_eq!(game.active_piece().unwrap().leftmost_col(), 0);
    }

    #[test]
    fn test_soft_drop_moves_diagonally_and_scores() {
        let mut game = game_with(PieceKind::T, "");
        let mut input = InputState::default();
        game.tick(&mut input);
        input.set_soft_drop(true);
        input.set_horizontal(Horizontal::Right);
        for _ in 0..4 {
            game.tick(&mut input);
        }
        assert_eq!(origin(&game), PiecePosition::new(1, 4));
        assert_eq!(game.drop_score, 1);
    }

    #[test]
    fn test_soft_drop_falls_straight_when_diagonal_blocked() {
        let mut game = game_with(
            PieceKind::O,
            &top_board(&["..........", "..........", "......#..."]),
        );
        let mut input = InputState::default();
        game.tick(&mut input);
        input.set_soft_drop(true);
        input.set_horizontal(Horizontal::Right);
        for _ in 0..4 {
            game.tick(&mut input);
        }
        // O blocks sit in columns 4-5 and rows 1-2; column 6 is blocked at row 2
        assert_eq!(origin(&game), PiecePosition::new(1, 3));
    }

    #[test]
    fn test_hard_drop_locks_and_scores_rows() {
        let mut game = game_with(PieceKind::I, "");
        let mut input = InputState::default();
        game.tick(&mut input);
        input.apply(Intent::HardDrop);
        let report = game.tick(&mut input);
        assert!(report.locked);
        assert_eq!(report.cleared_lines, 0);
        assert_eq!(game.stats().score(), 18);
        for col in 3..7 {
            assert_eq!(game.board().cell(19, col), Cell::Occupied(PieceKind::I));
        }
        assert!(game.piece_status().is_uncreated());

        let report = game.tick(&mut input);
        assert!(report.spawned);
        assert_eq!(game.spawn_count(), 2);
    }

    #[test]
    fn test_line_clear_runs_animation_then_removes_row() {
        let mut game = game_with(
            PieceKind::I,
            r"
            .........#
            ###....###
            ",
        );
        let mut input = InputState::default();
        game.tick(&mut input);
        input.apply(Intent::HardDrop);
        let report = game.tick(&mut input);
        assert_eq!(report.cleared_lines, 1);
        assert_eq!(game.stats().score(), 40 + 18);
        assert_eq!(game.stats().total_lines(), 1);
        assert_eq!(game.clear_animation().unwrap().rows(), &[19]);

        let lock_frame = game.frame() - 1;
        while game.clear_animation().is_some() {
            assert!(game.piece_status().is_collided());
            game.tick(&mut input);
        }
        assert_eq!(
            game.frame() - 1 - lock_frame,
            u64::from(CLEAR_ANIMATION_PERIOD * CLEAR_ANIMATION_STAGES)
        );
        assert_eq!(game.board(), &Board::from_ascii(".........I"));
        assert!(game.piece_status().is_uncreated());
    }

    #[test]
    fn test_rotation_rejected_on_collision() {
        let mut game = game_with(PieceKind::I, &top_board(&[".....#...."]));
        let mut input = InputState::default();
        game.tick(&mut input);
        input.apply(Intent::RotateCw);
        game.tick(&mut input);
        assert_eq!(game.active_piece().unwrap().rotation(), PieceRotation::default());

        input.apply(Intent::RotateCcw);
        game.tick(&mut input);
        assert_eq!(
            game.active_piece().unwrap().rotation(),
            PieceRotation::from_index(3)
        );
    }

    #[test]
    fn test_spawn_overlap_ends_game_and_merges_piece() {
        let mut game = game_with(PieceKind::O, &top_board(&["#.########"; 20]));
        let mut input = InputState::default();
        let report = game.tick(&mut input);
        assert!(report.spawned);
        assert!(report.game_over);
        assert!(game.status().is_game_over());
        // raised twice, so every block is above the grid
        assert_eq!(game.board().to_bit_board().count_occupied(), 180);

        let report = game.tick(&mut input);
        assert!(report.game_over);
        assert!(!report.spawned);
    }

    #[test]
    fn test_spawn_raised_once_merges_visible_blocks() {
        let mut game = game_with(PieceKind::I, &top_board(&["..........", "...#......"]));
        let mut input = InputState::default();
        let report = game.tick(&mut input);
        assert!(report.game_over);
        assert!(game.piece_status().is_collided());
        for col in 3..7 {
            assert_eq!(game.board().cell(0, col), Cell::Occupied(PieceKind::I));
        }
    }

    #[test]
    fn test_pause_stops_frames() {
        let mut game = game_with(PieceKind::T, "");
        let mut input = InputState::default();
        game.tick(&mut input);
        game.toggle_pause();
        for _ in 0..10 {
            game.tick(&mut input);
        }
        assert_eq!(game.frame(), 1);
        input.trigger_pause();
        game.tick(&mut input);
        assert!(game.status().is_running());
        game.tick(&mut input);
        assert_eq!(game.frame(), 2);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut game = game_with(PieceKind::I, "");
        let mut input = InputState::default();
        game.tick(&mut input);
        input.apply(Intent::HardDrop);
        game.tick(&mut input);
        assert_eq!(game.stats().locked_pieces(), 1);

        input.trigger_restart();
        let report = game.tick(&mut input);
        assert!(report.spawned);
        assert_eq!(game.stats().locked_pieces(), 0);
        assert_eq!(game.board().to_bit_board().count_occupied(), 0);
        assert_eq!(game.spawn_count(), 1);
        assert_eq!(game.restarts(), 1);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let config = GameConfig {
            seed: Some(SEED),
            ..GameConfig::default()
        };
        let mut a = Game::new(config);
        let mut b = Game::new(config);
        let mut input = InputState::default();
        for _ in 0..5 {
            assert_eq!(a.snapshot(), b.snapshot());
            input.apply(Intent::HardDrop);
            a.tick(&mut input);
            input.apply(Intent::HardDrop);
            b.tick(&mut input);
            input.apply(Intent::HardDrop);
            a.tick(&mut input);
            input.apply(Intent::HardDrop);
            b.tick(&mut input);
        }
    }
}
