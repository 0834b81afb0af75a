use crate::scene::ObjectId;

/// Hovered and selected objects as last resolved from the id buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickState {
    /// Object under the pointer as of the last completed readback.
    pub hovered: ObjectId,
    /// Object hovered at the last pointer-down.
    pub selected: ObjectId,
}

/// Receives pick-state changes, e.g. to update on-screen text.
pub trait PickSink {
    /// Called after `hovered` or `selected` changed.
    fn pick_changed(&mut self, state: PickState);
}

impl<F: FnMut(PickState)> PickSink for F {
    fn pick_changed(&mut self, state: PickState) {
        self(state);
    }
}

/// Sink that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl PickSink for NoopSink {
    fn pick_changed(&mut self, _state: PickState) {}
}
