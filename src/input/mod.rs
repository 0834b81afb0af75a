//! Input handling: event types, the per-poll sample, and the aggregator that
//! converts raw window events into samples.

/// Accumulate-then-drain event aggregation.
pub mod aggregator;
/// Platform-agnostic input events.
pub mod event;
/// Per-poll input snapshot types.
pub mod sample;

pub use aggregator::{InputAggregator, PointerEdge};
pub use event::{InputEvent, MouseButton, PointerKind, PointerPosition};
pub use sample::{AnalogInput, DigitalAction, DigitalInput, InputSample};
