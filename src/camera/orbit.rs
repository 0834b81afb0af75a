use glam::{Mat4, Quat, Vec3};

use super::basis::CameraBasis;
use super::CameraModel;
use crate::input::InputSample;
use crate::options::OrbitOptions;

/// Below this, drag cross products and rotation angles are treated as zero.
const EPSILON: f32 = 1e-7;

/// Arcball camera pivoting on the world origin.
///
/// Dragging spins the view around an axis perpendicular to the drag; on
/// release the spin continues and decays with `friction`. The wheel zooms
/// multiplicatively while the primary button is held.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    basis: CameraBasis,
    distance: f32,
    angular_velocity: f32,
    axis: Vec3,
    options: OrbitOptions,
}

impl OrbitCamera {
    /// Orbit camera at `eye` looking at the origin.
    #[must_use]
    pub fn new(eye: Vec3, options: OrbitOptions) -> Self {
        let basis = CameraBasis::look_at(eye, Vec3::ZERO);
        Self {
            basis,
            distance: eye.length().max(options.min_distance),
            angular_velocity: 0.0,
            axis: Vec3::Y,
            options,
        }
    }

    /// Distance from the pivot.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current spin rate in radians per second.
    #[must_use]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Current spin axis (unit length).
    #[must_use]
    pub fn axis(&self) -> Vec3 {
        self.axis
    }

    /// Tuning parameters.
    #[must_use]
    pub fn options(&self) -> &OrbitOptions {
        &self.options
    }

    /// Replace tuning parameters; takes effect on the next update.
    pub fn set_options(&mut self, options: OrbitOptions) {
        self.options = options;
        self.distance = self.distance.max(options.min_distance);
    }

    /// Rotate `back` about the spin axis and re-derive the other axes.
    fn rotate(&mut self, angle: f32) {
        let rotation = Quat::from_axis_angle(self.axis, angle);
        let back = (rotation * self.basis.back).normalize();
        let right = self
            .basis
            .up
            .cross(back)
            .try_normalize()
            .unwrap_or_else(|| (rotation * self.basis.right).normalize());
        let up = back.cross(right).normalize();
        self.basis.back = back;
        self.basis.right = right;
        self.basis.up = up;
    }
}

impl CameraModel for OrbitCamera {
    fn update(&mut self, dt: f32, sample: &InputSample) -> Mat4 {
        let analog = &sample.analog;
        if analog.touching {
            self.angular_velocity = 0.0;
        } else {
            self.angular_velocity *= self.options.friction.powf(dt);
        }

        let movement =
            self.basis.right * analog.x - self.basis.up * analog.y;
        let cross = movement.cross(self.basis.back);
        let magnitude = cross.length();
        if magnitude > EPSILON {
            self.axis = cross / magnitude;
            self.angular_velocity = magnitude * self.options.rotation_speed;
        }

        let angle = self.angular_velocity * dt;
        if angle > EPSILON {
            self.rotate(angle);
        }

        if analog.zoom != 0.0 {
            self.distance *= analog.zoom.mul_add(self.options.zoom_speed, 1.0);
            self.distance = self.distance.max(self.options.min_distance);
        }

        self.basis.position = self.basis.back * self.distance;
        self.basis.view_matrix()
    }

    fn basis(&self) -> &CameraBasis {
        &self.basis
    }

    fn set_basis(&mut self, basis: CameraBasis) {
        self.basis = basis;
        self.distance = basis.position.length().max(self.options.min_distance);
        self.angular_velocity = 0.0;
    }
}
