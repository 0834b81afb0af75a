//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, texture helpers, and shader
//! composition.

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Sampled textures and render attachments.
pub mod texture;
