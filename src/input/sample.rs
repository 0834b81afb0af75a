use serde::{Deserialize, Serialize};

/// Directional actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML bindings stay readable:
/// ```toml
/// [keybindings.movement]
/// KeyW = "forward"
/// Space = "up"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalAction {
    /// Move along -back.
    Forward,
    /// Move along +back.
    Backward,
    /// Move along -right.
    Left,
    /// Move along +right.
    Right,
    /// Move along +up.
    Up,
    /// Move along -up.
    Down,
}

/// Held state of the six directional keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DigitalInput {
    /// Forward key held.
    pub forward: bool,
    /// Backward key held.
    pub backward: bool,
    /// Left key held.
    pub left: bool,
    /// Right key held.
    pub right: bool,
    /// Up key held.
    pub up: bool,
    /// Down key held.
    pub down: bool,
}

impl DigitalInput {
    /// Set the held state for one action.
    pub fn set(&mut self, action: DigitalAction, held: bool) {
        let slot = match action {
            DigitalAction::Forward => &mut self.forward,
            DigitalAction::Backward => &mut self.backward,
            DigitalAction::Left => &mut self.left,
            DigitalAction::Right => &mut self.right,
            DigitalAction::Up => &mut self.up,
            DigitalAction::Down => &mut self.down,
        };
        *slot = held;
    }

    /// Whether any directional key is held.
    #[must_use]
    pub fn any(&self) -> bool {
        self.forward
            || self.backward
            || self.left
            || self.right
            || self.up
            || self.down
    }
}

/// Pointer and wheel deltas accumulated since the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnalogInput {
    /// Horizontal pointer delta in logical pixels.
    pub x: f32,
    /// Vertical pointer delta in logical pixels (positive = down).
    pub y: f32,
    /// Summed wheel steps (positive = zoom out).
    pub zoom: f32,
    /// Primary button or touch currently down.
    pub touching: bool,
}

/// Immutable per-poll input snapshot consumed by the cameras.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSample {
    /// Keyboard state.
    pub digital: DigitalInput,
    /// Pointer and wheel state.
    pub analog: AnalogInput,
}

impl InputSample {
    /// A sample with nothing held and no movement.
    pub const IDLE: Self = Self {
        digital: DigitalInput {
            forward: false,
            backward: false,
            left: false,
            right: false,
            up: false,
            down: false,
        },
        analog: AnalogInput {
            x: 0.0,
            y: 0.0,
            zoom: 0.0,
            touching: false,
        },
    };
}
