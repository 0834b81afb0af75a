//! Dual-pass frame orchestration and GPU object picking.
//!
//! [`PickingTarget`] draws the scene twice per frame (visible color, then
//! object ids), copies the id under the pointer into a staging buffer, and
//! resolves it asynchronously into a [`PickState`] on a later tick.

mod readback;
mod state;
mod target;

pub use readback::PickReadback;
pub use state::{NoopSink, PickSink, PickState};
pub use target::{FrameReport, PickingTarget};
