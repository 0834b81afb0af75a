use super::ViewerEngine;
use crate::camera::{CameraRig, Projection};
use crate::options::Options;
use crate::picking::{PickSink, PickState};
use crate::renderer::{RenderBackend, Viewport};
use crate::scene::Scene;

impl<B: RenderBackend> ViewerEngine<B> {
    /// The scene being drawn.
    #[must_use]
    pub fn scene(&self) -> &Scene<B::Resources> {
        &self.scene
    }

    /// Mutable scene access (model matrices, visibility).
    ///
    /// Removing objects through this reference bumps the scene generation,
    /// so an in-flight pick for the old scene is discarded.
    pub fn scene_mut(&mut self) -> &mut Scene<B::Resources> {
        &mut self.scene
    }

    /// The render backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.backend.viewport()
    }

    /// Both cameras and the active mode.
    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Mutable camera access.
    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    /// Hovered and selected object ids.
    #[must_use]
    pub fn pick_state(&self) -> PickState {
        self.picking.state()
    }

    /// Replace the pick-change sink.
    pub fn set_pick_sink(&mut self, sink: Box<dyn PickSink>) {
        self.picking.set_sink(sink);
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Apply new options: camera tuning, projection, key bindings, and
    /// background. Camera placement and mode are left as they are.
    pub fn set_options(&mut self, options: Options) {
        self.rig.apply_options(&options.camera);
        self.projection = Projection::from_options(&options.camera);
        self.input.set_key_bindings(options.keybindings.clone());
        self.options = options;
    }
}
