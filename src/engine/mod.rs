//! The viewer engine: scene, input, cameras, and the dual-pass frame.
//!
//! [`ViewerEngine`] is generic over the [`RenderBackend`] so the whole frame
//! path (input → camera → uniforms → color + pick passes → readback) runs
//! the same against wgpu and against a CPU stand-in.

mod accessors;
mod input;
/// Frame loop control.
pub mod scheduler;

use glam::Mat4;
pub use scheduler::{FramePacer, FrameScheduler};

use crate::camera::{CameraRig, Projection};
use crate::error::ViewerError;
use crate::gpu::render_context::RenderContext;
use crate::input::InputAggregator;
use crate::options::Options;
use crate::picking::{FrameReport, PickSink, PickingTarget};
use crate::renderer::{RenderBackend, Viewport, WgpuBackend};
use crate::scene::{MeshData, ObjectId, Scene, TextureData};

/// Owns everything needed to turn input into frames.
pub struct ViewerEngine<B: RenderBackend> {
    backend: B,
    scene: Scene<B::Resources>,
    input: InputAggregator,
    rig: CameraRig,
    projection: Projection,
    picking: PickingTarget,
    options: Options,
}

impl<B: RenderBackend> ViewerEngine<B> {
    /// Build an engine around `backend`. Pick changes go to `sink`.
    #[must_use]
    pub fn new(backend: B, options: Options, sink: Box<dyn PickSink>) -> Self {
        log::info!(
            "engine: {}x{} viewport, {:?} camera",
            backend.viewport().width,
            backend.viewport().height,
            options.camera.mode
        );
        Self {
            backend,
            scene: Scene::new(),
            input: InputAggregator::with_key_bindings(
                options.keybindings.clone(),
            ),
            rig: CameraRig::new(&options.camera),
            projection: Projection::from_options(&options.camera),
            picking: PickingTarget::new(sink),
            options,
        }
    }

    /// Current `projection * view`.
    #[must_use]
    pub fn view_proj(&self) -> Mat4 {
        let aspect = self.backend.viewport().aspect();
        self.projection.matrix(aspect) * self.rig.basis().view_matrix()
    }

    /// Run one tick of `dt` seconds.
    ///
    /// Completed pick readbacks are committed first, then the camera
    /// consumes the drained input sample and both passes are recorded.
    /// A lost or outdated surface reconfigures the backend and skips the
    /// frame; other frame failures are logged. Neither stops the loop.
    pub fn tick(&mut self, dt: f32) -> Option<FrameReport> {
        let _ = self.picking.poll_readback(&mut self.backend, &self.scene);

        let sample = self.input.poll();
        let _ = self.rig.update(dt, &sample);
        let view_proj = self.view_proj();

        match self.picking.render_frame(
            &mut self.backend,
            &self.scene,
            view_proj,
            self.input.pointer(),
            self.options.render.clear_color(),
        ) {
            Ok(report) => Some(report),
            Err(e) if e.is_recoverable() => {
                log::info!("{e}; reconfiguring surface");
                let viewport = self.backend.viewport();
                self.backend.resize(viewport);
                None
            }
            Err(e) => {
                log::warn!("frame skipped: {e}");
                None
            }
        }
    }

    /// Resize the render targets. `scale_factor` is physical pixels per
    /// logical pixel.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.backend
            .resize(Viewport::new(width, height, scale_factor));
    }

    /// Add an object whose backend resources are built by `build`.
    pub fn add_object(
        &mut self,
        model: Mat4,
        build: impl FnOnce(&B, ObjectId) -> B::Resources,
    ) -> ObjectId {
        let backend = &self.backend;
        let id = self.scene.add_object(model, |id| build(backend, id));
        log::debug!("added object {id}");
        id
    }

    /// Remove an object. Returns `false` for unknown ids. A hovered or
    /// selected id that referred to it resets to [`ObjectId::NONE`].
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.scene.remove_object(id).is_none() {
            return false;
        }
        self.picking.forget(id);
        log::debug!("removed object {id}");
        true
    }

    /// Drop every object and forget hovered/selected ids. A readback in
    /// flight is discarded when it lands.
    pub fn clear_scene(&mut self) {
        self.scene.clear();
        self.picking.reset();
        log::info!("scene cleared");
    }
}

impl ViewerEngine<WgpuBackend> {
    /// Create the wgpu backend on `context` and wrap it in an engine.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if the backend's pipelines cannot be
    /// built.
    pub fn with_context(
        context: RenderContext,
        scale_factor: f32,
        options: Options,
        sink: Box<dyn PickSink>,
    ) -> Result<Self, ViewerError> {
        let backend = WgpuBackend::new(context, scale_factor)?;
        Ok(Self::new(backend, options, sink))
    }

    /// Upload a mesh and add it to the scene. Objects without a texture get
    /// the grey fallback.
    pub fn add_mesh(
        &mut self,
        mesh: &MeshData,
        texture: Option<&TextureData>,
        model: Mat4,
    ) -> ObjectId {
        self.add_object(model, |backend, id| {
            backend.create_object_resources(id, mesh, texture)
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::camera::CameraMode;
    use crate::input::{InputEvent, MouseButton, PointerKind};
    use crate::picking::PickState;
    use crate::renderer::software::{SoftwareBackend, SoftwareResources};
    use crate::scene::placement;

    const DT: f32 = 1.0 / 60.0;

    fn options() -> Options {
        let mut options = Options::default();
        options.camera.eye = [0.0, 0.0, 5.0];
        options
    }

    fn engine() -> ViewerEngine<SoftwareBackend> {
        ViewerEngine::new(
            SoftwareBackend::new(Viewport::new(80, 60, 1.0)),
            options(),
            Box::new(crate::picking::NoopSink),
        )
    }

    /// A 4×4 world-space panel at the origin, facing the default eye.
    fn add_panel(engine: &mut ViewerEngine<SoftwareBackend>) -> ObjectId {
        engine.add_object(Mat4::IDENTITY, |_, id| {
            SoftwareResources::rect(id, Vec2::splat(-2.0), Vec2::splat(2.0), 0.0)
        })
    }

    fn move_to(engine: &mut ViewerEngine<SoftwareBackend>, x: f32, y: f32) {
        let _ = engine.handle_event(InputEvent::PointerMoved {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            kind: PointerKind::Mouse,
        });
    }

    fn run(engine: &mut ViewerEngine<SoftwareBackend>, ticks: usize) {
        for _ in 0..ticks {
            let _ = engine.tick(DT);
        }
    }

    /// Tick until `hovered` matches. A readback already in flight for the
    /// previous pointer position lands first, so this can take a few
    /// ticks.
    fn run_until_hovered(
        engine: &mut ViewerEngine<SoftwareBackend>,
        hovered: ObjectId,
    ) -> bool {
        for _ in 0..8 {
            let _ = engine.tick(DT);
            if engine.pick_state().hovered == hovered {
                return true;
            }
        }
        false
    }

    #[test]
    fn hover_and_select_through_the_camera() {
        let mut engine = engine();
        let panel = add_panel(&mut engine);
        move_to(&mut engine, 40.0, 30.0);
        run(&mut engine, 3);
        assert_eq!(engine.pick_state().hovered, panel);

        let _ = engine.handle_event(InputEvent::PointerButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(engine.pick_state().selected, panel);

        move_to(&mut engine, 1.0, 1.0);
        assert!(run_until_hovered(&mut engine, ObjectId::NONE));
        assert_eq!(engine.pick_state().selected, panel);
    }

    #[test]
    fn removing_the_selected_object_clears_it() {
        let mut engine = engine();
        let panel = add_panel(&mut engine);
        move_to(&mut engine, 40.0, 30.0);
        assert!(run_until_hovered(&mut engine, panel));
        let _ = engine.handle_event(InputEvent::PointerButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(engine.pick_state().selected, panel);

        assert!(engine.remove_object(panel));
        assert_eq!(engine.pick_state(), PickState::default());
        assert!(!engine.remove_object(panel));

        // The readback still in flight resolves against the new scene.
        run(&mut engine, 4);
        assert_eq!(engine.pick_state(), PickState::default());
    }

    #[test]
    fn moved_object_follows_its_model_matrix() {
        let mut engine = engine();
        let panel = add_panel(&mut engine);
        let offset = placement(Vec3::splat(0.25), Vec3::new(-100.0, 0.0, 0.0));
        assert!(engine.scene_mut().set_model(panel, offset));
        move_to(&mut engine, 40.0, 30.0);
        run(&mut engine, 3);
        assert_eq!(engine.pick_state().hovered, ObjectId::NONE);
    }

    #[test]
    fn toggle_key_switches_camera_and_keeps_position() {
        let mut engine = engine();
        let before = engine.rig().basis().position;
        assert!(engine.handle_key("Tab", true));
        assert_eq!(engine.rig().mode(), CameraMode::Fly);
        assert!(engine.rig().basis().position.abs_diff_eq(before, 1e-5));
        // Release is consumed without toggling back.
        assert!(engine.handle_key("Tab", false));
        assert_eq!(engine.rig().mode(), CameraMode::Fly);
    }

    #[test]
    fn movement_keys_drive_the_fly_camera() {
        let mut engine = engine();
        let _ = engine.handle_key("Tab", true);
        let start = engine.rig().basis().position;
        assert!(engine.handle_key("KeyW", true));
        run(&mut engine, 10);
        assert!(engine.rig().basis().position.z < start.z);
    }

    #[test]
    fn lost_surface_reconfigures_and_continues() {
        let mut engine = engine();
        let _ = add_panel(&mut engine);
        engine.backend_mut().lose_next_surface = true;
        assert!(engine.tick(DT).is_none());
        assert_eq!(engine.backend().resizes, 1);
        let report = engine.tick(DT).unwrap();
        assert_eq!(report.drawn, 1);
    }

    #[test]
    fn unavailable_frame_is_skipped_without_reconfigure() {
        let mut engine = engine();
        let _ = add_panel(&mut engine);
        engine.backend_mut().fail_next_frame = true;
        assert!(engine.tick(DT).is_none());
        assert_eq!(engine.backend().resizes, 0);
        assert!(engine.tick(DT).is_some());
    }

    #[test]
    fn clear_scene_resets_pick_state() {
        let mut engine = engine();
        let _ = add_panel(&mut engine);
        move_to(&mut engine, 40.0, 30.0);
        run(&mut engine, 3);
        assert!(!engine.pick_state().hovered.is_none());

        engine.clear_scene();
        assert_eq!(engine.pick_state().hovered, ObjectId::NONE);
        assert!(engine.scene().is_empty());
        run(&mut engine, 3);
        assert_eq!(engine.pick_state().hovered, ObjectId::NONE);
    }

    #[test]
    fn resize_reaches_the_backend() {
        let mut engine = engine();
        engine.resize(160, 120, 2.0);
        let viewport = engine.viewport();
        assert_eq!((viewport.width, viewport.height), (160, 120));
        assert!((viewport.scale_factor - 2.0).abs() < f32::EPSILON);
        assert_eq!(engine.backend().resizes, 1);
    }

    #[test]
    fn options_update_retunes_cameras() {
        let mut engine = engine();
        let mut options = options();
        options.camera.orbit.zoom_speed = 0.5;
        options.render.background = [1.0, 0.0, 0.0, 1.0];
        engine.set_options(options);
        assert!((engine.rig().orbit().options().zoom_speed - 0.5).abs() < 1e-6);
        assert!((engine.options().render.clear_color().r - 1.0).abs() < 1e-9);
    }
}
