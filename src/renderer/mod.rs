//! Rendering backends for the dual-pass frame.
//!
//! [`RenderBackend`] is the narrow seam between the frame orchestrator and
//! the graphics device: open a color pass, draw objects, open the id pass,
//! copy one pixel, submit, and poll an asynchronous readback.
//! [`WgpuBackend`] implements it on wgpu.

mod color_pass;
mod error;
mod gpu_backend;
mod pick_pass;
pub(crate) mod pipeline_util;
#[cfg(test)]
pub(crate) mod software;
mod uniforms;

pub use error::{FrameError, MissingResource};
pub use gpu_backend::{GpuFrame, GpuObjectResources, WgpuBackend};
pub use uniforms::{ObjectUniform, PickIdUniform};

use crate::input::PointerPosition;

/// Drawable area in physical pixels plus the logical→physical scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub scale_factor: f32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32, scale_factor: f32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Width / height, 1.0 for a degenerate viewport.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Physical pixel under a logical pointer position, or `None` when it
    /// falls outside the viewport.
    #[must_use]
    pub fn physical_pixel(&self, pointer: PointerPosition) -> Option<(u32, u32)> {
        let x = (pointer.x * self.scale_factor).floor();
        let y = (pointer.y * self.scale_factor).floor();
        // Negated comparison also rejects NaN.
        if !(x >= 0.0 && y >= 0.0)
            || x >= self.width as f32
            || y >= self.height as f32
        {
            return None;
        }
        Some((x as u32, y as u32))
    }
}

/// Graphics-device operations needed by the frame orchestrator.
///
/// A frame is driven strictly in this order: [`begin_frame`], then per
/// object [`write_uniforms`] + [`draw_color`], then [`begin_pick_pass`] and
/// per object [`draw_pick`], optionally [`copy_pick_pixel`], and finally
/// [`end_frame`]. Readback requests happen after submission.
///
/// [`begin_frame`]: Self::begin_frame
/// [`write_uniforms`]: Self::write_uniforms
/// [`draw_color`]: Self::draw_color
/// [`begin_pick_pass`]: Self::begin_pick_pass
/// [`draw_pick`]: Self::draw_pick
/// [`copy_pick_pixel`]: Self::copy_pick_pixel
/// [`end_frame`]: Self::end_frame
pub trait RenderBackend {
    /// Per-object GPU resources stored in the scene.
    type Resources;
    /// In-progress frame state (encoders, open passes, target image).
    type Frame;

    /// Current drawable area.
    fn viewport(&self) -> Viewport;

    /// Resize render targets. Also used to recover a lost surface.
    fn resize(&mut self, viewport: Viewport);

    /// Acquire the target image and open the color pass.
    fn begin_frame(
        &mut self,
        clear: wgpu::Color,
    ) -> Result<Self::Frame, FrameError>;

    /// Upload an object's per-frame uniforms.
    fn write_uniforms(
        &mut self,
        resources: &Self::Resources,
        uniform: &ObjectUniform,
    ) -> Result<(), MissingResource>;

    /// Draw one object into the color pass.
    fn draw_color(
        &mut self,
        frame: &mut Self::Frame,
        resources: &Self::Resources,
    ) -> Result<(), MissingResource>;

    /// Close the color pass and open the id pass, cleared to 0.
    fn begin_pick_pass(&mut self, frame: &mut Self::Frame);

    /// Draw one object's id into the pick pass.
    fn draw_pick(
        &mut self,
        frame: &mut Self::Frame,
        resources: &Self::Resources,
    ) -> Result<(), MissingResource>;

    /// Close the pick pass and copy the id at physical pixel `(x, y)` into
    /// the staging buffer. Callers guarantee the pixel is in bounds and no
    /// readback is in flight.
    fn copy_pick_pixel(&mut self, frame: &mut Self::Frame, x: u32, y: u32);

    /// Close any open pass, submit both command buffers, and present.
    fn end_frame(&mut self, frame: Self::Frame);

    /// Start mapping the staging buffer. Call after [`end_frame`] on a
    /// frame that copied a pixel.
    ///
    /// [`end_frame`]: Self::end_frame
    fn request_pick_readback(&mut self);

    /// Non-blocking check for a completed readback. Returns the raw id and
    /// releases the staging buffer once the map has finished.
    fn poll_pick_readback(&mut self) -> Option<u32>;
}
