use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Render", inline)]
#[serde(default)]
/// Frame appearance and pacing.
pub struct RenderOptions {
    /// Linear RGBA clear color of the color pass.
    #[schemars(skip)]
    pub background: [f32; 4],
    /// Frame-rate cap; 0 renders on every redraw.
    #[schemars(title = "Target FPS", range(min = 0, max = 240), extend("step" = 1))]
    pub target_fps: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            target_fps: 0,
        }
    }
}

impl RenderOptions {
    /// Background as a wgpu clear color.
    #[must_use]
    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.background.map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}
