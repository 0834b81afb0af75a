use glam::Mat4;

use super::readback::PickReadback;
use super::state::{NoopSink, PickSink, PickState};
use crate::input::PointerPosition;
use crate::renderer::{FrameError, ObjectUniform, RenderBackend};
use crate::scene::{ObjectId, Scene};

/// What one call to [`PickingTarget::render_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Objects drawn into the color pass.
    pub drawn: usize,
    /// Objects skipped for a missing resource in the color pass.
    pub skipped: usize,
    /// Objects skipped for a missing resource in the pick pass.
    pub pick_skipped: usize,
    /// Whether a pixel copy and readback were issued.
    pub pick_requested: bool,
}

/// Orchestrates the color pass, the id pass, and the pick readback.
///
/// Owns the [`PickState`]; it is written only when a readback completes
/// (`hovered`) or on pointer-down (`selected`). Changes are pushed to the
/// injected [`PickSink`].
pub struct PickingTarget {
    state: PickState,
    readback: PickReadback,
    sink: Box<dyn PickSink>,
}

impl Default for PickingTarget {
    fn default() -> Self {
        Self::new(Box::new(NoopSink))
    }
}

impl std::fmt::Debug for PickingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickingTarget")
            .field("state", &self.state)
            .field("readback", &self.readback)
            .finish_non_exhaustive()
    }
}

impl PickingTarget {
    /// Create a target reporting changes to `sink`.
    #[must_use]
    pub fn new(sink: Box<dyn PickSink>) -> Self {
        Self {
            state: PickState::default(),
            readback: PickReadback::default(),
            sink,
        }
    }

    /// Replace the change sink.
    pub fn set_sink(&mut self, sink: Box<dyn PickSink>) {
        self.sink = sink;
    }

    /// Current hovered/selected ids.
    #[must_use]
    pub fn state(&self) -> PickState {
        self.state
    }

    /// Whether a readback has been issued and not yet consumed.
    #[must_use]
    pub fn readback_in_flight(&self) -> bool {
        self.readback.in_flight()
    }

    fn commit(&mut self, state: PickState) {
        if state != self.state {
            self.state = state;
            self.sink.pick_changed(state);
        }
    }

    /// Record and draw one frame.
    ///
    /// Objects with a missing resource are skipped and logged; the frame
    /// always completes. A pixel copy is issued only when `pointer` maps
    /// inside the viewport and no readback is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] if the backend cannot start a frame; nothing
    /// is drawn in that case.
    pub fn render_frame<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        scene: &Scene<B::Resources>,
        view_proj: Mat4,
        pointer: Option<PointerPosition>,
        clear: wgpu::Color,
    ) -> Result<FrameReport, FrameError> {
        let mut frame = backend.begin_frame(clear)?;
        let mut report = FrameReport::default();

        let mut drawn = Vec::with_capacity(scene.len());
        for object in scene.visible_objects() {
            let uniform = ObjectUniform::new(view_proj, object.model);
            let result = backend
                .write_uniforms(&object.resources, &uniform)
                .and_then(|()| backend.draw_color(&mut frame, &object.resources));
            match result {
                Ok(()) => drawn.push(object),
                Err(missing) => {
                    log::warn!("skipping object {}: {missing}", object.id);
                    report.skipped += 1;
                }
            }
        }
        report.drawn = drawn.len();

        backend.begin_pick_pass(&mut frame);
        for object in &drawn {
            if let Err(missing) = backend.draw_pick(&mut frame, &object.resources)
            {
                log::warn!("skipping pick for object {}: {missing}", object.id);
                report.pick_skipped += 1;
            }
        }

        let pixel = pointer.and_then(|p| backend.viewport().physical_pixel(p));
        if let Some((x, y)) = pixel.filter(|_| !self.readback.in_flight()) {
            backend.copy_pick_pixel(&mut frame, x, y);
            report.pick_requested = true;
        }
        backend.end_frame(frame);

        if report.pick_requested {
            backend.request_pick_readback();
            let _ = self.readback.begin(scene.generation());
        }
        Ok(report)
    }

    /// Consume a completed readback, if any, and update `hovered`.
    ///
    /// Results issued against an older scene generation are discarded.
    /// Returns the new state when the readback was committed.
    pub fn poll_readback<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        scene: &Scene<B::Resources>,
    ) -> Option<PickState> {
        if !self.readback.in_flight() {
            return None;
        }
        let raw = backend.poll_pick_readback()?;
        let generation = self.readback.finish()?;
        if generation != scene.generation() {
            log::debug!(
                "discarding stale pick {raw} (generation {generation}, scene {})",
                scene.generation()
            );
            return None;
        }
        self.commit(PickState {
            hovered: scene.resolve(raw),
            ..self.state
        });
        Some(self.state)
    }

    /// Pointer went down: select whatever is hovered.
    pub fn pointer_down(&mut self) -> PickState {
        self.commit(PickState {
            selected: self.state.hovered,
            ..self.state
        });
        self.state
    }

    /// Drop `id` from the hovered and selected slots after it left the
    /// scene.
    pub fn forget(&mut self, id: ObjectId) {
        let clear = |slot: ObjectId| {
            if slot == id {
                ObjectId::NONE
            } else {
                slot
            }
        };
        self.commit(PickState {
            hovered: clear(self.state.hovered),
            selected: clear(self.state.selected),
        });
    }

    /// Forget hovered/selected ids, e.g. after the scene was cleared. An
    /// in-flight readback stays tracked until it completes.
    pub fn reset(&mut self) {
        self.commit(PickState::default());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::{Vec2, Vec3};

    use super::*;
    use crate::renderer::software::{SoftwareBackend, SoftwareResources};
    use crate::renderer::{MissingResource, Viewport};
    use crate::scene::placement;

    const CLEAR: wgpu::Color = wgpu::Color::BLACK;

    fn backend() -> SoftwareBackend {
        SoftwareBackend::new(Viewport::new(64, 48, 1.0))
    }

    fn center() -> Option<PointerPosition> {
        Some(PointerPosition::new(32.0, 24.0))
    }

    /// Render, then poll until the readback lands (bounded).
    fn tick_until_picked(
        target: &mut PickingTarget,
        backend: &mut SoftwareBackend,
        scene: &Scene<SoftwareResources>,
        pointer: Option<PointerPosition>,
    ) -> Option<PickState> {
        for _ in 0..4 {
            if let Some(state) = target.poll_readback(backend, scene) {
                return Some(state);
            }
            let _ = target
                .render_frame(backend, scene, Mat4::IDENTITY, pointer, CLEAR)
                .unwrap();
        }
        target.poll_readback(backend, scene)
    }

    /// Scene with one full-viewport object; returns it together with the id.
    fn single_object_scene() -> (Scene<SoftwareResources>, ObjectId) {
        let mut scene = Scene::new();
        // Skip ids 1-6 so the object gets id 7.
        for _ in 0..6 {
            let id = scene.add_object(Mat4::IDENTITY, |id| {
                SoftwareResources::full_screen(id, 0.5)
            });
            let _ = scene.remove_object(id);
        }
        let id = scene.add_object(Mat4::IDENTITY, |id| {
            SoftwareResources::full_screen(id, 0.5)
        });
        (scene, id)
    }

    #[test]
    fn full_viewport_object_is_hovered() {
        let (scene, id) = single_object_scene();
        assert_eq!(id.get(), 7);
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let state =
            tick_until_picked(&mut target, &mut backend, &scene, center())
                .unwrap();
        assert_eq!(state.hovered.get(), 7);
        assert_eq!(backend.copies, vec![(32, 24)]);
    }

    #[test]
    fn empty_scene_hovers_nothing() {
        let (mut scene, id) = single_object_scene();
        let mut backend = backend();
        let mut target = PickingTarget::default();
        let _ = tick_until_picked(&mut target, &mut backend, &scene, center());
        assert_eq!(target.state().hovered, id);

        let _ = scene.remove_object(id);
        let state =
            tick_until_picked(&mut target, &mut backend, &scene, center())
                .unwrap();
        assert_eq!(state.hovered, ObjectId::NONE);
    }

    #[test]
    fn readback_completes_on_a_later_tick() {
        let (scene, _) = single_object_scene();
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let report = target
            .render_frame(&mut backend, &scene, Mat4::IDENTITY, center(), CLEAR)
            .unwrap();
        assert!(report.pick_requested);
        assert!(target.readback_in_flight());
        // Map not finished yet: the render loop does not block.
        assert_eq!(target.poll_readback(&mut backend, &scene), None);
        assert_eq!(target.state().hovered, ObjectId::NONE);
        assert!(target.poll_readback(&mut backend, &scene).is_some());
        assert!(!target.readback_in_flight());
    }

    #[test]
    fn no_second_copy_while_in_flight() {
        let (scene, _) = single_object_scene();
        let mut backend = backend();
        let mut target = PickingTarget::default();

        for _ in 0..3 {
            let _ = target
                .render_frame(&mut backend, &scene, Mat4::IDENTITY, center(), CLEAR)
                .unwrap();
        }
        assert_eq!(backend.copies.len(), 1);
        assert_eq!(backend.readback_requests, 1);
        assert_eq!(backend.frames, 3);
    }

    #[test]
    fn pointer_outside_skips_resolve() {
        let (scene, _) = single_object_scene();
        let mut backend = backend();
        let mut target = PickingTarget::default();

        for pointer in [None, Some(PointerPosition::new(64.0, 10.0))] {
            let report = target
                .render_frame(&mut backend, &scene, Mat4::IDENTITY, pointer, CLEAR)
                .unwrap();
            assert!(!report.pick_requested);
            assert_eq!(report.drawn, 1);
        }
        assert!(backend.copies.is_empty());
        assert!(!target.readback_in_flight());
    }

    #[test]
    fn pointer_is_scaled_to_physical_pixels() {
        let (scene, _) = single_object_scene();
        let mut backend = SoftwareBackend::new(Viewport::new(64, 48, 2.0));
        let mut target = PickingTarget::default();
        let pointer = Some(PointerPosition::new(10.25, 20.75));
        let _ = target
            .render_frame(&mut backend, &scene, Mat4::IDENTITY, pointer, CLEAR)
            .unwrap();
        assert_eq!(backend.copies, vec![(20, 41)]);
    }

    #[test]
    fn missing_resource_skips_only_that_object() {
        let mut scene = Scene::new();
        let broken = scene.add_object(Mat4::IDENTITY, |id| SoftwareResources {
            missing: Some(MissingResource::VertexBuffer),
            ..SoftwareResources::full_screen(id, 0.1)
        });
        let no_uniform = scene.add_object(Mat4::IDENTITY, |id| SoftwareResources {
            missing: Some(MissingResource::UniformBuffer),
            ..SoftwareResources::full_screen(id, 0.1)
        });
        let healthy = scene.add_object(Mat4::IDENTITY, |id| {
            SoftwareResources::full_screen(id, 0.5)
        });
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let report = target
            .render_frame(&mut backend, &scene, Mat4::IDENTITY, center(), CLEAR)
            .unwrap();
        assert_eq!(report.drawn, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(backend.color_draws, vec![healthy]);
        assert_eq!(backend.pick_draws, vec![healthy]);

        // The nearer broken objects never reach the id buffer.
        let state = tick_until_picked(&mut target, &mut backend, &scene, center())
            .unwrap();
        assert_eq!(state.hovered, healthy);
        assert_ne!(state.hovered, broken);
        assert_ne!(state.hovered, no_uniform);
    }

    #[test]
    fn nearest_object_wins_the_pick() {
        let mut scene = Scene::new();
        let far = scene.add_object(Mat4::IDENTITY, |id| {
            SoftwareResources::full_screen(id, 0.8)
        });
        let near = scene.add_object(Mat4::IDENTITY, |id| {
            SoftwareResources::rect(id, Vec2::splat(-0.5), Vec2::splat(0.5), 0.2)
        });
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let state = tick_until_picked(&mut target, &mut backend, &scene, center())
            .unwrap();
        assert_eq!(state.hovered, near);

        let corner = Some(PointerPosition::new(2.0, 2.0));
        let state = tick_until_picked(&mut target, &mut backend, &scene, corner)
            .unwrap();
        assert_eq!(state.hovered, far);
    }

    #[test]
    fn model_matrix_moves_the_pick_footprint() {
        let mut scene = Scene::new();
        let model = placement(Vec3::splat(0.25), Vec3::new(0.75, 0.0, 0.0));
        let id = scene.add_object(model, |id| SoftwareResources::full_screen(id, 0.5));
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let state = tick_until_picked(&mut target, &mut backend, &scene, center())
            .unwrap();
        assert_eq!(state.hovered, ObjectId::NONE);

        // x = 0.75 in NDC is 7/8 of the way across.
        let right = Some(PointerPosition::new(56.0, 24.0));
        let state = tick_until_picked(&mut target, &mut backend, &scene, right)
            .unwrap();
        assert_eq!(state.hovered, id);
    }

    #[test]
    fn stale_readback_is_discarded() {
        let (mut scene, id) = single_object_scene();
        let mut backend = backend();
        let mut target = PickingTarget::default();

        let _ = target
            .render_frame(&mut backend, &scene, Mat4::IDENTITY, center(), CLEAR)
            .unwrap();
        // Scene changes while the map is pending.
        let other = scene.add_object(Mat4::IDENTITY, |id| {
            SoftwareResources::full_screen(id, 0.9)
        });
        let _ = scene.remove_object(other);

        assert_eq!(target.poll_readback(&mut backend, &scene), None);
        assert_eq!(target.poll_readback(&mut backend, &scene), None);
        assert!(!target.readback_in_flight());
        assert_eq!(target.state().hovered, ObjectId::NONE);

        // The next request goes through normally.
        let state =
            tick_until_picked(&mut target, &mut backend, &scene, center())
                .unwrap();
        assert_eq!(state.hovered, id);
    }

    #[test]
    fn pointer_down_selects_hovered_and_notifies() {
        let (scene, id) = single_object_scene();
        let mut backend = backend();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let mut target = PickingTarget::new(Box::new(move |state: PickState| {
            sink_seen.borrow_mut().push(state);
        }));

        let _ = tick_until_picked(&mut target, &mut backend, &scene, center());
        let state = target.pointer_down();
        assert_eq!(state.selected, id);
        // Selecting the same object again is not a change.
        let _ = target.pointer_down();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].hovered, id);
        assert_eq!(seen[0].selected, ObjectId::NONE);
        assert_eq!(seen[1].selected, id);
    }

    #[test]
    fn forgetting_an_id_clears_both_slots() {
        let (scene, id) = single_object_scene();
        let mut backend = backend();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink_seen = Rc::clone(&seen);
        let mut target = PickingTarget::new(Box::new(move |state: PickState| {
            sink_seen.borrow_mut().push(state);
        }));
        let _ = tick_until_picked(&mut target, &mut backend, &scene, center());
        let _ = target.pointer_down();

        // Unrelated ids leave the state alone.
        target.forget(ObjectId::from_raw(3));
        assert_eq!(target.state().selected, id);

        target.forget(id);
        assert_eq!(target.state(), PickState::default());
        assert_eq!(seen.borrow().last().copied(), Some(PickState::default()));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn frame_error_draws_nothing() {
        let (scene, _) = single_object_scene();
        let mut backend = backend();
        backend.fail_next_frame = true;
        let mut target = PickingTarget::default();
        let result =
            target.render_frame(&mut backend, &scene, Mat4::IDENTITY, center(), CLEAR);
        assert!(matches!(result, Err(FrameError::Unavailable)));
        assert!(backend.copies.is_empty());
        assert!(!target.readback_in_flight());
    }

    #[test]
    fn hidden_objects_are_not_picked() {
        let (mut scene, id) = single_object_scene();
        assert!(scene.set_visible(id, false));
        let mut backend = backend();
        let mut target = PickingTarget::default();
        let state =
            tick_until_picked(&mut target, &mut backend, &scene, center())
                .unwrap();
        assert_eq!(state.hovered, ObjectId::NONE);
        assert!(backend.color_draws.is_empty());
    }
}
