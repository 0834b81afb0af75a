use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat3, Mat4, Vec3};

use super::basis::CameraBasis;
use super::CameraModel;
use crate::input::{DigitalInput, InputSample};
use crate::options::FlyOptions;

/// First-person camera: drag to look, directional keys to thrust.
///
/// Orientation is rebuilt from `yaw`/`pitch` every frame rather than
/// composed onto the previous basis. Velocity eases toward the key-driven
/// target so movement carries some inertia.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    basis: CameraBasis,
    yaw: f32,
    pitch: f32,
    velocity: Vec3,
    options: FlyOptions,
}

impl FlyCamera {
    /// Fly camera at `eye` facing `target`.
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, options: FlyOptions) -> Self {
        let mut camera = Self {
            basis: CameraBasis::IDENTITY,
            yaw: 0.0,
            pitch: 0.0,
            velocity: Vec3::ZERO,
            options,
        };
        camera.set_basis(CameraBasis::look_at(eye, target));
        camera
    }

    /// Heading around world +Y, in `[0, 2π)`.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Elevation, in `[-π/2, π/2]`.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current velocity in world units per second.
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Tuning parameters.
    #[must_use]
    pub fn options(&self) -> &FlyOptions {
        &self.options
    }

    /// Replace tuning parameters; takes effect on the next update.
    pub fn set_options(&mut self, options: FlyOptions) {
        self.options = options;
    }

    fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = wrap_angle(yaw);
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        let rotation =
            Mat3::from_rotation_y(self.yaw) * Mat3::from_rotation_x(self.pitch);
        self.basis = CameraBasis::from_rotation(rotation, self.basis.position);
    }

    /// Unit thrust direction in world space, zero when no key is held.
    fn thrust(&self, digital: &DigitalInput) -> Vec3 {
        let axis = |positive: bool, negative: bool| {
            f32::from(u8::from(positive)) - f32::from(u8::from(negative))
        };
        let direction = self.basis.right * axis(digital.right, digital.left)
            + self.basis.up * axis(digital.up, digital.down)
            + self.basis.back * axis(digital.backward, digital.forward);
        direction.normalize_or_zero()
    }
}

/// Wrap into `[0, 2π)`. `rem_euclid` can round up to exactly 2π for tiny
/// negative inputs.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

impl CameraModel for FlyCamera {
    fn update(&mut self, dt: f32, sample: &InputSample) -> Mat4 {
        let turn = dt * self.options.rotation_speed;
        self.set_angles(
            self.yaw - sample.analog.x * turn,
            self.pitch - sample.analog.y * turn,
        );

        let target = self.thrust(&sample.digital) * self.options.movement_speed;
        self.velocity =
            target.lerp(self.velocity, self.options.friction.powf(dt));
        self.basis.position += self.velocity * dt;

        self.basis.view_matrix()
    }

    fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    /// Adopt `basis` by recovering yaw/pitch from its `back` axis; roll is
    /// discarded.
    fn set_basis(&mut self, basis: CameraBasis) {
        let back = basis.back.normalize_or(Vec3::Z);
        self.basis.position = basis.position;
        self.velocity = Vec3::ZERO;
        self.set_angles(
            back.x.atan2(back.z),
            (-back.y).clamp(-1.0, 1.0).asin(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::AnalogInput;

    const DT: f32 = 1.0 / 60.0;

    fn look(x: f32, y: f32) -> InputSample {
        InputSample {
            analog: AnalogInput {
                x,
                y,
                ..AnalogInput::default()
            },
            ..InputSample::IDLE
        }
    }

    fn forward() -> InputSample {
        let mut sample = InputSample::IDLE;
        sample.digital.forward = true;
        sample
    }

    #[test]
    fn forward_moves_along_negative_back() {
        let options = FlyOptions {
            movement_speed: 10.0,
            friction: 0.0,
            ..FlyOptions::default()
        };
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let mut camera = FlyCamera::new(eye, Vec3::ZERO, options);
        let back = camera.basis().back;

        let _ = camera.update(1.0, &forward());
        let moved = camera.basis().position - eye;
        assert!((moved.length() - 10.0).abs() < 1e-4);
        assert!(moved.normalize().abs_diff_eq(-back, 1e-5));
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut camera =
            FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, FlyOptions::default());
        let sequence = [500.0, 500.0, -3000.0, 7.5, -7.5, 1e6, -1e6, 0.0];
        for y in sequence.into_iter().cycle().take(200) {
            let _ = camera.update(DT, &look(0.0, y));
            assert!((-FRAC_PI_2..=FRAC_PI_2).contains(&camera.pitch()));
            assert!(camera.basis().orthonormal_error() < 1e-5);
        }
    }

    #[test]
    fn yaw_stays_wrapped() {
        let mut camera =
            FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, FlyOptions::default());
        let sequence = [900.0, -1e-6, -2500.0, 1e-7, 377.0, -1e5];
        for x in sequence.into_iter().cycle().take(300) {
            let _ = camera.update(DT, &look(x, 0.0));
            assert!((0.0..TAU).contains(&camera.yaw()), "{}", camera.yaw());
        }
    }

    #[test]
    fn wrap_angle_never_returns_tau() {
        assert_eq!(wrap_angle(-f32::EPSILON * 0.5), 0.0);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
        assert!((wrap_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn construction_faces_target() {
        let eye = Vec3::new(3.0, 2.0, 5.0);
        let camera = FlyCamera::new(eye, Vec3::ZERO, FlyOptions::default());
        let expected = (Vec3::ZERO - eye).normalize();
        assert!(camera.basis().forward().abs_diff_eq(expected, 1e-5));
        assert_eq!(camera.basis().position, eye);
    }

    #[test]
    fn friction_carries_velocity_after_release() {
        let options = FlyOptions {
            friction: 0.5,
            ..FlyOptions::default()
        };
        let mut camera = FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, options);
        let _ = camera.update(1.0, &forward());
        // Halfway from rest to full speed.
        assert!((camera.velocity().length() - 5.0).abs() < 1e-4);

        let _ = camera.update(1.0, &InputSample::IDLE);
        assert!((camera.velocity().length() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut camera =
            FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, FlyOptions::default());
        let mut sample = forward();
        sample.digital.backward = true;
        let _ = camera.update(1.0, &sample);
        assert_eq!(camera.velocity(), Vec3::ZERO);
    }

    #[test]
    fn diagonal_thrust_is_normalized() {
        let options = FlyOptions {
            friction: 0.0,
            ..FlyOptions::default()
        };
        let mut camera = FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z, options);
        let mut sample = forward();
        sample.digital.right = true;
        sample.digital.up = true;
        let _ = camera.update(1.0, &sample);
        assert!((camera.velocity().length() - options.movement_speed).abs() < 1e-4);
    }
}
