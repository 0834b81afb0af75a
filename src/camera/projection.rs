use glam::Mat4;

use crate::options::CameraOptions;

/// Perspective projection parameters. The aspect ratio comes from the
/// viewport at draw time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_options(&CameraOptions::default())
    }
}

impl Projection {
    /// Projection from camera options.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        Self {
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Build the projection matrix for the given aspect ratio.
    #[must_use]
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            aspect.max(f32::EPSILON),
            self.znear,
            self.zfar,
        )
    }
}
