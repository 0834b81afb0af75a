use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::camera::CameraMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection, initial placement, and per-mode control parameters.
pub struct CameraOptions {
    /// Camera mode active at startup.
    #[schemars(title = "Mode")]
    pub mode: CameraMode,
    /// Initial eye position in world space.
    #[schemars(skip)]
    pub eye: [f32; 3],
    /// Initial look-at point. The orbit camera always pivots on the origin.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Orbit (arcball) camera parameters.
    pub orbit: OrbitOptions,
    /// Fly (first-person) camera parameters.
    pub fly: FlyOptions,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            mode: CameraMode::Orbit,
            eye: [3.0, 2.0, 5.0],
            target: [0.0; 3],
            fovy: 72.0,
            znear: 1.0,
            zfar: 100.0,
            orbit: OrbitOptions::default(),
            fly: FlyOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Orbit", inline)]
#[serde(default)]
/// Arcball camera tuning.
pub struct OrbitOptions {
    /// Radians per second per pixel of drag.
    #[schemars(title = "Rotation Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub rotation_speed: f32,
    /// Fractional distance change per wheel step.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Fraction of spin retained after one second without input, in `[0, 1)`.
    #[schemars(title = "Friction", range(min = 0.0, max = 0.99), extend("step" = 0.001))]
    pub friction: f32,
    /// Closest allowed distance to the pivot.
    #[schemars(skip)]
    pub min_distance: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            rotation_speed: 1.0,
            zoom_speed: 0.1,
            friction: 0.001,
            min_distance: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Fly", inline)]
#[serde(default)]
/// First-person camera tuning.
pub struct FlyOptions {
    /// Units per second at full thrust.
    #[schemars(title = "Movement Speed", range(min = 1.0, max = 100.0), extend("step" = 1.0))]
    pub movement_speed: f32,
    /// Radians per second per pixel of drag.
    #[schemars(title = "Rotation Speed", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub rotation_speed: f32,
    /// Fraction of velocity retained after one second, in `[0, 1)`.
    #[schemars(title = "Friction", range(min = 0.0, max = 0.99), extend("step" = 0.001))]
    pub friction: f32,
}

impl Default for FlyOptions {
    fn default() -> Self {
        Self {
            movement_speed: 10.0,
            rotation_speed: 1.0,
            friction: 0.01,
        }
    }
}
