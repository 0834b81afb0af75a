/// Platform-agnostic pointer and wheel events.
///
/// These are fed into an [`InputAggregator`](super::InputAggregator), which
/// folds them into the next [`InputSample`](super::InputSample). Keyboard
/// input goes through
/// [`InputAggregator::handle_key`](super::InputAggregator::handle_key)
/// instead, since key codes are plain strings.
///
/// # Example
///
/// ```
/// use scenepick::input::{InputAggregator, InputEvent, MouseButton};
///
/// let mut input = InputAggregator::default();
/// input.handle_event(InputEvent::PointerButton {
///     button: MouseButton::Left,
///     pressed: true,
/// });
/// assert!(input.poll().analog.touching);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved.
    PointerMoved {
        /// New horizontal position in logical pixels.
        x: f32,
        /// New vertical position in logical pixels.
        y: f32,
        /// Horizontal movement since the previous event.
        dx: f32,
        /// Vertical movement since the previous event (positive = down).
        dy: f32,
        /// Device that produced the movement.
        kind: PointerKind,
    },
    /// Pointer left the viewport.
    PointerLeft,
    /// Pointer button pressed or released.
    PointerButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = toward the user, i.e. zoom out).
    Wheel {
        /// Raw scroll amount; only its sign is used.
        delta: f32,
    },
}

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerKind {
    /// Mouse or trackpad: movement only counts while the primary button is
    /// held.
    #[default]
    Mouse,
    /// Touch contact: movement always counts.
    Touch,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

/// Absolute pointer position in logical (CSS-style) pixels, relative to the
/// top-left corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl PointerPosition {
    /// Create a pointer position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
