//! Shared utilities.

/// Frame timing and FPS limiting.
pub mod frame_timing;
