use glam::{Mat4, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::basis::CameraBasis;
use super::fly::FlyCamera;
use super::orbit::OrbitCamera;
use super::CameraModel;
use crate::input::InputSample;
use crate::options::CameraOptions;

/// Which camera drives the view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Arcball around the origin.
    #[default]
    Orbit,
    /// First-person flight.
    Fly,
}

impl CameraMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Orbit => Self::Fly,
            Self::Fly => Self::Orbit,
        }
    }
}

/// Holds both camera variants and routes updates to the active one.
///
/// Switching modes hands the outgoing camera's basis to the incoming one,
/// so the view continues from where it was.
#[derive(Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    orbit: OrbitCamera,
    fly: FlyCamera,
}

impl CameraRig {
    /// Build both cameras from options; the initial mode comes from
    /// `options.mode`.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let eye = Vec3::from_array(options.eye);
        let target = Vec3::from_array(options.target);
        let mut rig = Self {
            mode: CameraMode::Orbit,
            orbit: OrbitCamera::new(eye, options.orbit),
            fly: FlyCamera::new(eye, target, options.fly),
        };
        rig.set_mode(options.mode);
        rig
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch modes, carrying the current basis across.
    pub fn set_mode(&mut self, mode: CameraMode) {
        if mode == self.mode {
            return;
        }
        let basis = *self.active().basis();
        self.mode = mode;
        self.active_mut().set_basis(basis);
        log::info!("camera mode: {mode:?}");
    }

    /// Flip between orbit and fly.
    pub fn toggle(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// The camera currently driving the view.
    #[must_use]
    pub fn active(&self) -> &dyn CameraModel {
        match self.mode {
            CameraMode::Orbit => &self.orbit,
            CameraMode::Fly => &self.fly,
        }
    }

    /// Mutable access to the active camera.
    pub fn active_mut(&mut self) -> &mut dyn CameraModel {
        match self.mode {
            CameraMode::Orbit => &mut self.orbit,
            CameraMode::Fly => &mut self.fly,
        }
    }

    /// The orbit camera, active or not.
    #[must_use]
    pub fn orbit(&self) -> &OrbitCamera {
        &self.orbit
    }

    /// The fly camera, active or not.
    #[must_use]
    pub fn fly(&self) -> &FlyCamera {
        &self.fly
    }

    /// Apply new tuning to both cameras.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.orbit.set_options(options.orbit);
        self.fly.set_options(options.fly);
    }

    /// Advance the active camera and return its view matrix.
    pub fn update(&mut self, dt: f32, sample: &InputSample) -> Mat4 {
        self.active_mut().update(dt, sample)
    }

    /// Basis of the active camera.
    #[must_use]
    pub fn basis(&self) -> CameraBasis {
        *self.active().basis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_preserves_position_and_direction() {
        let mut rig = CameraRig::new(&CameraOptions::default());
        let _ = rig.update(0.0, &InputSample::IDLE);
        let before = rig.basis();

        rig.toggle();
        assert_eq!(rig.mode(), CameraMode::Fly);
        let after = rig.basis();
        assert!(after.position.abs_diff_eq(before.position, 1e-6));
        assert!(after.back.abs_diff_eq(before.back, 1e-5));
        assert!(after.orthonormal_error() < 1e-5);
    }

    #[test]
    fn switching_back_recomputes_orbit_distance() {
        let mut rig = CameraRig::new(&CameraOptions {
            mode: CameraMode::Fly,
            ..CameraOptions::default()
        });
        let mut sample = InputSample::IDLE;
        sample.digital.forward = true;
        for _ in 0..30 {
            let _ = rig.update(1.0 / 60.0, &sample);
        }
        let fly_position = rig.basis().position;

        rig.set_mode(CameraMode::Orbit);
        assert!((rig.orbit().distance() - fly_position.length()).abs() < 1e-5);
        assert!(rig.basis().position.abs_diff_eq(fly_position, 1e-6));
    }

    #[test]
    fn setting_same_mode_is_a_no_op() {
        let mut rig = CameraRig::new(&CameraOptions::default());
        let before = rig.basis();
        rig.set_mode(CameraMode::Orbit);
        assert_eq!(rig.basis(), before);
    }

    #[test]
    fn initial_mode_comes_from_options() {
        let rig = CameraRig::new(&CameraOptions {
            mode: CameraMode::Fly,
            ..CameraOptions::default()
        });
        assert_eq!(rig.mode(), CameraMode::Fly);
        assert_eq!(CameraMode::Fly.toggled(), CameraMode::Orbit);
    }
}
