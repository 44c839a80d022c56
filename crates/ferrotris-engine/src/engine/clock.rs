/// Frames between repeated lateral or soft-drop steps.
pub const MOVE_PERIOD: u32 = 4;

/// Frames per stage of the line-clear animation.
pub const CLEAR_ANIMATION_PERIOD: u32 = 4;

/// Stages of the line-clear animation (one per column pair, center outward).
pub const CLEAR_ANIMATION_STAGES: u32 = 5;

/// Gravity period in frames per row for levels 0..=28.
const LEVEL_SPEEDS: [u32; 29] = [
    48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
];

/// Frames between gravity steps at `level`.
///
/// Follows the level table (1 frame from level 29 on) but never runs faster
/// than [`MOVE_PERIOD`].
///
/// ```
/// use ferrotris_engine::{MOVE_PERIOD, gravity_period};
///
/// assert_eq!(gravity_period(0), 48);
/// assert_eq!(gravity_period(9), 6);
/// assert_eq!(gravity_period(29), MOVE_PERIOD);
/// ```
#[must_use]
pub fn gravity_period(level: u32) -> u32 {
    let period = usize::try_from(level)
        .ok()
        .and_then(|level| LEVEL_SPEEDS.get(level))
        .copied()
        .unwrap_or(1);
    period.max(MOVE_PERIOD)
}

/// Fires at most once every `period` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimer {
    period: u32,
    last: u64,
}

impl FrameTimer {
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self { period, last: 0 }
    }

    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn set_period(&mut self, period: u32) {
        self.period = period;
    }

    pub fn reset(&mut self, frame: u64) {
        self.last = frame;
    }

    /// Returns `true` and restarts the period when at least `period` frames
    /// passed since the last firing.
    pub fn check(&mut self, frame: u64) -> bool {
        if frame.saturating_sub(self.last) >= u64::from(self.period) {
            self.last = frame;
            true
        } else {
            false
        }
    }
}

/// Frame counter with the gravity and movement timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    frame: u64,
    pub(crate) fall: FrameTimer,
    pub(crate) movement: FrameTimer,
}

impl GameClock {
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            frame: 0,
            fall: FrameTimer::new(gravity_period(level)),
            movement: FrameTimer::new(MOVE_PERIOD),
        }
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance(&mut self) {
        self.frame += 1;
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.fall.set_period(gravity_period(level));
    }
}
