use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::DigitalAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Configurable keyboard bindings.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format (`"KeyW"`,
/// `"Space"`, `"ShiftLeft"`). Several keys may share one action.
pub struct KeybindingOptions {
    /// Maps key string → directional action.
    pub movement: HashMap<String, DigitalAction>,
    /// Key that switches between orbit and fly mode.
    pub toggle_camera: String,
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let movement = HashMap::from([
            ("KeyW".into(), DigitalAction::Forward),
            ("KeyS".into(), DigitalAction::Backward),
            ("KeyA".into(), DigitalAction::Left),
            ("KeyD".into(), DigitalAction::Right),
            ("Space".into(), DigitalAction::Up),
            ("ShiftLeft".into(), DigitalAction::Down),
            ("ControlLeft".into(), DigitalAction::Down),
            ("KeyC".into(), DigitalAction::Down),
        ]);
        Self {
            movement,
            toggle_camera: "Tab".into(),
        }
    }
}

impl KeybindingOptions {
    /// Look up the directional action for a key string.
    #[must_use]
    pub fn movement(&self, key: &str) -> Option<DigitalAction> {
        self.movement.get(key).copied()
    }

    /// Whether `key` is the camera-mode toggle.
    #[must_use]
    pub fn is_toggle_camera(&self, key: &str) -> bool {
        self.toggle_camera == key
    }
}
