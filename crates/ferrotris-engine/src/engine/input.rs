/// One control decision for a single tick.
///
/// Both a keyboard layer and the placement agent speak in intents, which the
/// engine reads through [`InputState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Intent {
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    #[display("rotate-cw")]
    RotateCw,
    #[display("rotate-ccw")]
    RotateCcw,
    #[display("soft-drop")]
    SoftDrop,
    #[display("hard-drop")]
    HardDrop,
    #[display("idle")]
    Idle,
}

/// Horizontal direction held by the player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    #[default]
    None,
    Left,
    Right,
}

impl Horizontal {
    #[must_use]
    pub fn delta(self) -> i8 {
        match self {
            Horizontal::None => 0,
            Horizontal::Left => -1,
            Horizontal::Right => 1,
        }
    }
}

/// Rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Input channel owned by the driver and handed to [`Game::tick`](crate::Game::tick).
///
/// Held inputs (`horizontal`, `soft_drop`) stay active until changed.
/// Triggered inputs (rotation, hard drop, pause, restart) fire once and are
/// consumed by the engine.
///
/// # Example
///
/// ```
/// use ferrotris_engine::{Horizontal, InputState, Intent};
///
/// let mut input = InputState::default();
/// input.apply(Intent::MoveLeft);
/// assert_eq!(input.horizontal(), Horizontal::Left);
///
/// input.apply(Intent::SoftDrop);
/// assert_eq!(input.horizontal(), Horizontal::None);
/// assert!(input.soft_drop());
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    horizontal: Horizontal,
    soft_drop: bool,
    rotation: Option<Rotation>,
    hard_drop: bool,
    pause: bool,
    restart: bool,
}

impl InputState {
    #[must_use]
    pub fn horizontal(&self) -> Horizontal {
        self.horizontal
    }

    #[must_use]
    pub fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    pub fn set_horizontal(&mut self, horizontal: Horizontal) {
        self.horizontal = horizontal;
    }

    pub fn set_soft_drop(&mut self, soft_drop: bool) {
        self.soft_drop = soft_drop;
    }

    pub fn trigger_rotation(&mut self, rotation: Rotation) {
        self.rotation = Some(rotation);
    }

    pub fn trigger_hard_drop(&mut self) {
        self.hard_drop = true;
    }

    pub fn trigger_pause(&mut self) {
        self.pause = true;
    }

    pub fn trigger_restart(&mut self) {
        self.restart = true;
    }

    /// Replaces the held inputs with the given intent.
    ///
    /// Movement intents release soft drop, and soft drop releases the
    /// horizontal direction. Rotations and hard drop become one-shot triggers
    /// and release every held input.
    pub fn apply(&mut self, intent: Intent) {
        self.horizontal = Horizontal::None;
        self.soft_drop = false;
        match intent {
            Intent::MoveLeft => self.horizontal = Horizontal::Left,
            Intent::MoveRight => self.horizontal = Horizontal::Right,
            Intent::SoftDrop => self.soft_drop = true,
            Intent::RotateCw => self.rotation = Some(Rotation::Clockwise),
            Intent::RotateCcw => self.rotation = Some(Rotation::CounterClockwise),
            Intent::HardDrop => self.hard_drop = true,
            Intent::Idle => {}
        }
    }

    pub(crate) fn take_rotation(&mut self) -> Option<Rotation> {
        self.rotation.take()
    }

    pub(crate) fn take_hard_drop(&mut self) -> bool {
        std::mem::take(&mut self.hard_drop)
    }

    pub(crate) fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause)
    }

    pub(crate) fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }
}
