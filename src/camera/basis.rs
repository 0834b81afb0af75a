use glam::{Mat3, Mat4, Vec3, Vec4};

/// Rigid camera transform: three orthonormal axes plus a position.
///
/// Each vector is stored independently; [`to_mat4`](Self::to_mat4) and
/// [`from_mat4`](Self::from_mat4) assemble and decompose the equivalent
/// column-major camera-to-world matrix on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Camera +X in world space.
    pub right: Vec3,
    /// Camera +Y in world space.
    pub up: Vec3,
    /// Camera +Z in world space (the camera looks along `-back`).
    pub back: Vec3,
    /// Eye position in world space.
    pub position: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraBasis {
    /// Camera at the origin looking down -Z.
    pub const IDENTITY: Self = Self {
        right: Vec3::X,
        up: Vec3::Y,
        back: Vec3::Z,
        position: Vec3::ZERO,
    };

    /// Basis at `eye` looking toward `target` with world +Y as the up hint.
    ///
    /// Degenerate inputs (eye on target, or looking straight up/down) fall
    /// back to the identity axes instead of producing NaNs.
    #[must_use]
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        let back = (eye - target).try_normalize().unwrap_or(Vec3::Z);
        let right = Vec3::Y.cross(back).try_normalize().unwrap_or(Vec3::X);
        let up = back.cross(right);
        Self {
            right,
            up,
            back,
            position: eye,
        }
    }

    /// Basis with the given rotation and position.
    #[must_use]
    pub fn from_rotation(rotation: Mat3, position: Vec3) -> Self {
        Self {
            right: rotation.x_axis,
            up: rotation.y_axis,
            back: rotation.z_axis,
            position,
        }
    }

    /// Camera-to-world matrix with columns `right`, `up`, `back`,
    /// `position`.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            self.back.extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// Decompose a camera-to-world matrix. The projective row is ignored.
    #[must_use]
    pub fn from_mat4(matrix: Mat4) -> Self {
        Self {
            right: matrix.x_axis.truncate(),
            up: matrix.y_axis.truncate(),
            back: matrix.z_axis.truncate(),
            position: matrix.w_axis.truncate(),
        }
    }

    /// World-to-camera (view) matrix.
    ///
    /// Inverts the rigid transform directly: the rotation block is
    /// transposed and the translation projected onto each axis.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        let Self {
            right,
            up,
            back,
            position,
        } = *self;
        Mat4::from_cols(
            Vec4::new(right.x, up.x, back.x, 0.0),
            Vec4::new(right.y, up.y, back.y, 0.0),
            Vec4::new(right.z, up.z, back.z, 0.0),
            Vec4::new(
                -right.dot(position),
                -up.dot(position),
                -back.dot(position),
                1.0,
            ),
        )
    }

    /// Direction the camera looks along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        -self.back
    }

    /// Largest deviation of the axes from an orthonormal frame.
    #[must_use]
    pub fn orthonormal_error(&self) -> f32 {
        let lengths = [self.right, self.up, self.back]
            .map(|axis| (axis.length() - 1.0).abs());
        let dots = [
            self.right.dot(self.up),
            self.up.dot(self.back),
            self.back.dot(self.right),
        ]
        .map(f32::abs);
        lengths.into_iter().chain(dots).fold(0.0, f32::max)
    }
}
