use super::ViewerEngine;
use crate::input::{InputEvent, PointerEdge};
use crate::renderer::RenderBackend;

impl<B: RenderBackend> ViewerEngine<B> {
    /// Feed a pointer or wheel event. A primary-button press selects the
    /// hovered object.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<PointerEdge> {
        let edge = self.input.handle_event(event);
        if edge == Some(PointerEdge::Down) {
            let state = self.picking.pointer_down();
            log::debug!("selected {}", state.selected);
        }
        edge
    }

    /// Feed a key press or release by key-code name (e.g. `"KeyW"`).
    ///
    /// The camera toggle key flips orbit/fly on press. Returns `true` if
    /// the key is bound to anything.
    pub fn handle_key(&mut self, key: &str, pressed: bool) -> bool {
        if self.input.key_bindings().is_toggle_camera(key) {
            if pressed {
                self.rig.toggle();
            }
            return true;
        }
        self.input.handle_key(key, pressed)
    }
}
