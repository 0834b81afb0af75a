//! CPU stand-in for the graphics device, used by orchestration tests.
//!
//! Objects are screen-facing rectangles given in object space; the last
//! uploaded MVP projects their corners to pixels and the bounding box is
//! filled into an id buffer with a depth test. Readbacks complete one poll
//! after they are requested.

use glam::{Mat4, Vec2, Vec3};
use rustc_hash::FxHashMap;

use super::error::{FrameError, MissingResource};
use super::uniforms::ObjectUniform;
use super::{RenderBackend, Viewport};
use crate::scene::ObjectId;

/// Per-object test resources.
#[derive(Debug, Clone)]
pub(crate) struct SoftwareResources {
    pub(crate) id: ObjectId,
    /// Opposite corners of an axis-aligned rectangle in object space.
    pub(crate) min: Vec3,
    pub(crate) max: Vec3,
    /// Simulates a handle that was never created.
    pub(crate) missing: Option<MissingResource>,
}

impl SoftwareResources {
    /// Rectangle covering clip space `[-1, 1]²` at depth `z`.
    pub(crate) fn full_screen(id: ObjectId, z: f32) -> Self {
        Self::rect(id, Vec2::NEG_ONE, Vec2::ONE, z)
    }

    pub(crate) fn rect(id: ObjectId, min: Vec2, max: Vec2, z: f32) -> Self {
        Self {
            id,
            min: min.extend(z),
            max: max.extend(z),
            missing: None,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SoftwareFrame {
    pick_open: bool,
}

#[derive(Debug)]
pub(crate) struct SoftwareBackend {
    viewport: Viewport,
    ids: Vec<u32>,
    depth: Vec<f32>,
    mvps: FxHashMap<ObjectId, Mat4>,
    staged: Option<u32>,
    /// Polls remaining before the pending map completes.
    map_delay: Option<u32>,
    /// Fail the next `begin_frame`.
    pub(crate) fail_next_frame: bool,
    /// Report a lost surface from the next `begin_frame`.
    pub(crate) lose_next_surface: bool,
    pub(crate) frames: usize,
    pub(crate) color_draws: Vec<ObjectId>,
    pub(crate) pick_draws: Vec<ObjectId>,
    pub(crate) copies: Vec<(u32, u32)>,
    pub(crate) readback_requests: usize,
    pub(crate) resizes: usize,
}

impl SoftwareBackend {
    pub(crate) fn new(viewport: Viewport) -> Self {
        let len = (viewport.width * viewport.height) as usize;
        Self {
            viewport,
            ids: vec![0; len],
            depth: vec![1.0; len],
            mvps: FxHashMap::default(),
            staged: None,
            map_delay: None,
            fail_next_frame: false,
            lose_next_surface: false,
            frames: 0,
            color_draws: Vec::new(),
            pick_draws: Vec::new(),
            copies: Vec::new(),
            readback_requests: 0,
            resizes: 0,
        }
    }

    /// Id at a physical pixel after the last pick pass.
    pub(crate) fn id_at(&self, x: u32, y: u32) -> u32 {
        self.ids[(y * self.viewport.width + x) as usize]
    }

    fn check(resources: &SoftwareResources) -> Result<(), MissingResource> {
        resources.missing.map_or(Ok(()), Err)
    }

    /// NDC → pixel, y down.
    fn to_pixel(&self, ndc: Vec3) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width as f32,
            (1.0 - ndc.y) * 0.5 * self.viewport.height as f32,
        )
    }

    fn rasterize(&mut self, resources: &SoftwareResources) {
        let Some(mvp) = self.mvps.get(&resources.id).copied() else {
            return;
        };
        let a = mvp.project_point3(resources.min);
        let b = mvp.project_point3(resources.max);
        let (pa, pb) = (self.to_pixel(a), self.to_pixel(b));
        let lo = pa.min(pb).max(Vec2::ZERO);
        let hi = pa.max(pb).min(Vec2::new(
            self.viewport.width as f32,
            self.viewport.height as f32,
        ));
        let z = a.z;
        for y in lo.y as u32..hi.y.ceil() as u32 {
            for x in lo.x as u32..hi.x.ceil() as u32 {
                let i = (y * self.viewport.width + x) as usize;
                if z < self.depth[i] {
                    self.depth[i] = z;
                    self.ids[i] = resources.id.get();
                }
            }
        }
    }
}

impl RenderBackend for SoftwareBackend {
    type Resources = SoftwareResources;
    type Frame = SoftwareFrame;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        let readback = (self.staged, self.map_delay);
        *self = Self {
            resizes: self.resizes + 1,
            frames: self.frames,
            ..Self::new(viewport)
        };
        (self.staged, self.map_delay) = readback;
    }

    fn begin_frame(
        &mut self,
        _clear: wgpu::Color,
    ) -> Result<SoftwareFrame, FrameError> {
        if std::mem::take(&mut self.fail_next_frame) {
            return Err(FrameError::Unavailable);
        }
        if std::mem::take(&mut self.lose_next_surface) {
            return Err(FrameError::Surface(wgpu::SurfaceError::Lost));
        }
        self.frames += 1;
        self.color_draws.clear();
        self.pick_draws.clear();
        Ok(SoftwareFrame::default())
    }

    fn write_uniforms(
        &mut self,
        resources: &SoftwareResources,
        uniform: &ObjectUniform,
    ) -> Result<(), MissingResource> {
        if resources.missing == Some(MissingResource::UniformBuffer) {
            return Err(MissingResource::UniformBuffer);
        }
        let _ = self.mvps.insert(resources.id, uniform.mvp());
        Ok(())
    }

    fn draw_color(
        &mut self,
        _frame: &mut SoftwareFrame,
        resources: &SoftwareResources,
    ) -> Result<(), MissingResource> {
        Self::check(resources)?;
        self.color_draws.push(resources.id);
        Ok(())
    }

    fn begin_pick_pass(&mut self, frame: &mut SoftwareFrame) {
        frame.pick_open = true;
        self.ids.fill(0);
        self.depth.fill(1.0);
    }

    fn draw_pick(
        &mut self,
        frame: &mut SoftwareFrame,
        resources: &SoftwareResources,
    ) -> Result<(), MissingResource> {
        assert!(frame.pick_open, "pick draw outside the pick pass");
        Self::check(resources)?;
        self.pick_draws.push(resources.id);
        self.rasterize(resources);
        Ok(())
    }

    fn copy_pick_pixel(&mut self, frame: &mut SoftwareFrame, x: u32, y: u32) {
        assert!(self.map_delay.is_none(), "copy while readback in flight");
        frame.pick_open = false;
        self.copies.push((x, y));
        self.staged = Some(self.id_at(x, y));
    }

    fn end_frame(&mut self, _frame: SoftwareFrame) {}

    fn request_pick_readback(&mut self) {
        self.readback_requests += 1;
        self.map_delay = Some(1);
    }

    fn poll_pick_readback(&mut self) -> Option<u32> {
        match self.map_delay? {
            0 => {
                self.map_delay = None;
                self.staged.take()
            }
            n => {
                self.map_delay = Some(n - 1);
                None
            }
        }
    }
}
