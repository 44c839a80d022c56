use crate::core::MAX_CLEARED_LINES;

/// Base points for clearing 0..=4 lines at once, multiplied by `level + 1`.
pub const BASE_LINE_POINTS: [u64; MAX_CLEARED_LINES + 1] = [0, 40, 100, 300, 1200];

/// Highest reachable level.
pub const MAX_LEVEL: u32 = 99;

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Score, level and line statistics for one game.
///
/// - **Score**: `(level + 1) * BASE_LINE_POINTS[cleared] + drop_score` per lock
/// - **Level**: `starting_level + total_lines / 10`, capped at 99
/// - **Locked pieces** and a histogram of 0..4-line clears
///
/// The level used for scoring a lock is the level before that lock's lines
/// are added.
///
/// # Example
///
/// ```
/// use ferrotris_engine::GameStats;
///
/// let mut stats = GameStats::new(0);
/// stats.lock_piece(4, 12); // four lines plus 12 rows of soft drop
///
/// assert_eq!(stats.score(), 1200 + 12);
/// assert_eq!(stats.total_lines(), 4);
/// assert_eq!(stats.line_clear_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    starting_level: u32,
    level: u32,
    total_lines: u32,
    locked_pieces: u32,
    line_clear_counter: [u32; MAX_CLEARED_LINES + 1],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameStats {
    #[must_use]
    pub const fn new(starting_level: u32) -> Self {
        let level = if starting_level > MAX_LEVEL {
            MAX_LEVEL
        } else {
            starting_level
        };
        Self {
            score: 0,
            starting_level: level,
            level,
            total_lines: 0,
            locked_pieces: 0,
            line_clear_counter: [0; MAX_CLEARED_LINES + 1],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn starting_level(&self) -> u32 {
        self.starting_level
    }

    #[must_use]
    pub const fn total_lines(&self) -> u32 {
        self.total_lines
    }

    /// Number of pieces locked and scored. A piece merged on top-out is not counted.
    #[must_use]
    pub const fn locked_pieces(&self) -> u32 {
        self.locked_pieces
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Index `n` counts locks that cleared exactly `n` lines.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[u32; MAX_CLEARED_LINES + 1] {
        &self.line_clear_counter
    }

    /// Applies one lock: scores `cleared_lines` at the current level, adds the
    /// drop score, then advances lines and level.
    pub fn lock_piece(&mut self, cleared_lines: usize, drop_score: u32) {
        let cleared_lines = cleared_lines.min(MAX_CLEARED_LINES);
        self.locked_pieces += 1;
        self.line_clear_counter[cleared_lines] += 1;
        self.score +=
            u64::from(self.level + 1) * BASE_LINE_POINTS[cleared_lines] + u64::from(drop_score);

        #[expect(clippy::cast_possible_truncation)]
        let cleared = cleared_lines as u32;
        self.total_lines += cleared;
        self.level = (self.starting_level + self.total_lines / LINES_PER_LEVEL).min(MAX_LEVEL);
    }
}
