//! Folds raw platform events into per-poll [`InputSample`]s.
//!
//! The `InputAggregator` owns all transient input state (held keys, pointer
//! accumulators, button state, last cursor position) and the key-binding
//! map. It is the only thing that sits between raw window events and the
//! cameras.

use super::event::{InputEvent, MouseButton, PointerKind, PointerPosition};
use super::sample::{AnalogInput, DigitalInput, InputSample};
use crate::options::KeybindingOptions;

/// Primary-button edge reported by
/// [`InputAggregator::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEdge {
    /// Primary button (or touch) went down.
    Down,
    /// Primary button (or touch) went up.
    Up,
}

/// Accumulate-then-drain input state with a single consumer.
///
/// Digital state persists across polls until the matching release. Analog
/// accumulators are zeroed by every [`poll`](Self::poll).
///
/// # Usage
///
/// ```
/// use scenepick::input::{InputAggregator, InputEvent, MouseButton, PointerKind};
///
/// let mut input = InputAggregator::default();
/// input.handle_key("KeyW", true);
/// let _ = input.handle_event(InputEvent::PointerButton {
///     button: MouseButton::Left,
///     pressed: true,
/// });
/// let _ = input.handle_event(InputEvent::PointerMoved {
///     x: 12.0,
///     y: 4.0,
///     dx: 2.0,
///     dy: -1.0,
///     kind: PointerKind::Mouse,
/// });
///
/// let sample = input.poll();
/// assert!(sample.digital.forward);
/// assert_eq!(sample.analog.x, 2.0);
/// assert_eq!(input.poll().analog.x, 0.0);
/// ```
#[derive(Debug, Default)]
pub struct InputAggregator {
    digital: DigitalInput,
    /// Pending analog deltas; `touching` is unused here.
    accumulated: AnalogInput,
    /// Whether the primary button (or a touch) is currently down.
    primary_held: bool,
    /// Last cursor position inside the viewport.
    pointer: Option<PointerPosition>,
    key_bindings: KeybindingOptions,
}

impl InputAggregator {
    /// Create an aggregator with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            ..Self::default()
        }
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Replace the key bindings. Held keys stay held until released.
    pub fn set_key_bindings(&mut self, key_bindings: KeybindingOptions) {
        self.key_bindings = key_bindings;
    }

    /// Last known cursor position, `None` when outside the viewport.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerPosition> {
        self.pointer
    }

    /// Whether the primary button (or a touch) is currently down.
    #[must_use]
    pub fn primary_held(&self) -> bool {
        self.primary_held
    }

    /// Record a key press or release. Unbound keys are ignored.
    ///
    /// Returns `true` if the key is bound to a directional action.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        let Some(action) = self.key_bindings.movement(key) else {
            return false;
        };
        self.digital.set(action, pressed);
        true
    }

    /// Fold one pointer/wheel event into the pending sample.
    ///
    /// Returns the primary-button edge, if this event produced one.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<PointerEdge> {
        match event {
            InputEvent::PointerMoved {
                x,
                y,
                dx,
                dy,
                kind,
            } => {
                self.pointer = Some(PointerPosition::new(x, y));
                self.handle_pointer_moved(dx, dy, kind)
            }
            InputEvent::PointerLeft => {
                self.pointer = None;
                None
            }
            InputEvent::PointerButton { button, pressed } => {
                self.handle_button(button, pressed)
            }
            InputEvent::Wheel { delta } => {
                if self.primary_held && delta != 0.0 {
                    self.accumulated.zoom += delta.signum();
                }
                None
            }
        }
    }

    /// Mouse movement only counts while the primary button is held; touch
    /// movement always counts and implies contact.
    fn handle_pointer_moved(
        &mut self,
        dx: f32,
        dy: f32,
        kind: PointerKind,
    ) -> Option<PointerEdge> {
        let edge = match kind {
            PointerKind::Mouse => None,
            PointerKind::Touch if !self.primary_held => {
                self.primary_held = true;
                Some(PointerEdge::Down)
            }
            PointerKind::Touch => None,
        };
        if self.primary_held {
            self.accumulated.x += dx;
            self.accumulated.y += dy;
        }
        edge
    }

    fn handle_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<PointerEdge> {
        if button != MouseButton::Left || pressed == self.primary_held {
            return None;
        }
        self.primary_held = pressed;
        Some(if pressed {
            PointerEdge::Down
        } else {
            PointerEdge::Up
        })
    }

    /// Snapshot the current state and drain the analog accumulators.
    pub fn poll(&mut self) -> InputSample {
        let analog = AnalogInput {
            touching: self.primary_held,
            ..std::mem::take(&mut self.accumulated)
        };
        InputSample {
            digital: self.digital,
            analog,
        }
    }
}
