//! Camera system for 3D scene viewing.
//!
//! Two interchangeable [`CameraModel`]s, an arcball [`OrbitCamera`] and a
//! first-person [`FlyCamera`], both integrate an [`InputSample`] into a
//! [`CameraBasis`] and return a view matrix. [`CameraRig`] owns one of each
//! and switches between them at runtime.

/// Orthonormal camera transform.
pub mod basis;
/// First-person camera.
pub mod fly;
/// Arcball camera.
pub mod orbit;
/// Perspective projection.
pub mod projection;
/// Runtime-switchable camera pair.
pub mod rig;

pub use basis::CameraBasis;
pub use fly::FlyCamera;
pub use orbit::OrbitCamera;
pub use projection::Projection;
pub use rig::{CameraMode, CameraRig};

use glam::Mat4;

use crate::input::InputSample;

/// A camera driven by per-frame input samples.
pub trait CameraModel {
    /// Integrate `sample` over `dt` seconds and return the new view matrix.
    fn update(&mut self, dt: f32, sample: &InputSample) -> Mat4;

    /// Current camera transform.
    fn basis(&self) -> &CameraBasis;

    /// Adopt another camera's transform, deriving any internal state from it.
    fn set_basis(&mut self, basis: CameraBasis);

    /// View matrix for the current transform without advancing time.
    fn view_matrix(&self) -> Mat4 {
        self.basis().view_matrix()
    }
}
