//! Centralized viewer options with TOML preset support.
//!
//! Camera tuning, key bindings, and frame settings are consolidated here.
//! Options serialize to/from TOML; the UI-exposed subset is described by a
//! JSON Schema for an external parameter panel.

mod camera;
mod keybindings;
mod render;

use std::path::Path;

pub use camera::{CameraOptions, FlyOptions, OrbitOptions};
pub use keybindings::KeybindingOptions;
pub use render::RenderOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[camera.fly]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera placement, projection, and control parameters.
    pub camera: CameraOptions,
    /// Frame appearance and pacing.
    pub render: RenderOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read, or
    /// [`ViewerError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] if serialization fails, or
    /// [`ViewerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraMode;
    use crate::input::DigitalAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[camera]
mode = "fly"

[camera.fly]
movement_speed = 25.0
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.mode, CameraMode::Fly);
        assert_eq!(opts.camera.fly.movement_speed, 25.0);
        // Everything else should be default
        assert_eq!(opts.camera.fly.friction, 0.01);
        assert_eq!(opts.camera.orbit.zoom_speed, 0.1);
        assert_eq!(opts.camera.fovy, 72.0);
        assert_eq!(opts.render.target_fps, 0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, ViewerError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.movement("KeyW"),
            Some(DigitalAction::Forward)
        );
        assert_eq!(
            opts.keybindings.movement("ShiftLeft"),
            Some(DigitalAction::Down)
        );
        assert_eq!(opts.keybindings.movement("KeyZ"), None);
        assert!(opts.keybindings.is_toggle_camera("Tab"));
    }

    #[test]
    fn keybindings_parse_from_toml() {
        let toml_str = r#"
[keybindings]
toggle_camera = "KeyM"

[keybindings.movement]
ArrowUp = "forward"
PageDown = "down"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.keybindings.movement.len(), 2);
        assert_eq!(
            opts.keybindings.movement("PageDown"),
            Some(DigitalAction::Down)
        );
        assert!(opts.keybindings.is_toggle_camera("KeyM"));
    }

    #[test]
    fn clear_color_matches_background() {
        let render = RenderOptions {
            background: [0.25, 0.5, 0.75, 1.0],
            ..RenderOptions::default()
        };
        let color = render.clear_color();
        assert_eq!(color.r, 0.25);
        assert_eq!(color.b, 0.75);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("render"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("orbit").is_some());
        assert!(camera.get("eye").is_none());
        assert!(camera.get("znear").is_none());
    }
}
