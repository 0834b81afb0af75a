//! Object-id pass and single-pixel readback.
//!
//! Renders object ids into an offscreen `R32Uint` texture, then copies the
//! pixel under the cursor into a small staging buffer and maps it
//! asynchronously. This is exact: it matches what is rendered on screen.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use super::pipeline_util::{cleared_depth, object_pipeline, uniform_entry};
use crate::error::ViewerError;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::GpuTexture;

/// Row pitch of the one-pixel copy (wgpu's copy alignment).
const STAGING_ROW_BYTES: u32 = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

// Map states shared with the `map_async` callback.
const MAP_PENDING: u8 = 0;
const MAP_READY: u8 = 1;
const MAP_FAILED: u8 = 2;

/// Id texture, depth, staging buffer, and pick pipeline.
pub(crate) struct PickPass {
    pub(crate) pipeline: Arc<wgpu::RenderPipeline>,
    layout: wgpu::BindGroupLayout,
    texture: GpuTexture,
    depth: GpuTexture,
    staging_buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    /// Whether `map_async` has been requested and not yet consumed.
    map_requested: bool,
    /// Written by the map callback; the callback touches nothing else.
    map_state: Arc<AtomicU8>,
}

impl PickPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        (width, height): (u32, u32),
    ) -> Result<Self, ViewerError> {
        let shader = composer.compose(device, Shader::Picking)?;
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Picking Bind Group Layout"),
                entries: &[uniform_entry(0), uniform_entry(1)],
            });
        let pipeline = object_pipeline(
            device,
            "Picking Pipeline",
            &shader,
            &layout,
            wgpu::ColorTargetState {
                format: wgpu::TextureFormat::R32Uint,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            },
        );
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Staging Buffer"),
            size: u64::from(STAGING_ROW_BYTES),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline: Arc::new(pipeline),
            layout,
            texture: Self::create_id_texture(device, (width, height)),
            depth: GpuTexture::depth(device, "Picking Depth Texture", (width, height)),
            staging_buffer,
            width,
            height,
            map_requested: false,
            map_state: Arc::new(AtomicU8::new(MAP_PENDING)),
        })
    }

    fn create_id_texture(device: &wgpu::Device, size: (u32, u32)) -> GpuTexture {
        GpuTexture::attachment(
            device,
            "Picking Texture",
            size,
            wgpu::TextureFormat::R32Uint,
            wgpu::TextureUsages::COPY_SRC,
        )
    }

    /// Resize the id and depth textures. The staging buffer is untouched,
    /// so an in-flight readback survives.
    pub(crate) fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.texture = Self::create_id_texture(device, (width, height));
        self.depth =
            GpuTexture::depth(device, "Picking Depth Texture", (width, height));
    }

    /// Bind group for one object: shared uniform plus its id buffer.
    pub(crate) fn create_bind_group(
        &self,
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        id_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Picking Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: id_buffer.as_entire_binding(),
                },
            ],
        })
    }

    /// Open the id pass, cleared to 0 (no object).
    pub(crate) fn begin(
        &self,
        encoder: &mut wgpu::CommandEncoder,
    ) -> wgpu::RenderPass<'static> {
        encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Picking Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.texture.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(cleared_depth(&self.depth.view)),
                ..Default::default()
            })
            .forget_lifetime()
    }

    /// Copy the id at `(x, y)` into the staging buffer. Skipped when out of
    /// bounds or while the buffer is mapped or awaiting mapping.
    pub(crate) fn copy_pixel_to_staging(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        x: u32,
        y: u32,
    ) {
        if x >= self.width || y >= self.height || self.map_requested {
            return;
        }
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(STAGING_ROW_BYTES),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Start the async map (call after `queue.submit`).
    pub(crate) fn start_readback(&mut self) {
        if self.map_requested {
            return;
        }
        self.map_requested = true;
        self.map_state.store(MAP_PENDING, Ordering::SeqCst);
        let map_state = Arc::clone(&self.map_state);
        self.staging_buffer
            .slice(..4)
            .map_async(wgpu::MapMode::Read, move |result| {
                let state = if result.is_ok() { MAP_READY } else { MAP_FAILED };
                map_state.store(state, Ordering::SeqCst);
            });
    }

    /// Try to complete the readback without blocking. Returns the raw id if
    /// the map finished, `None` while pending.
    ///
    /// A failed map releases the buffer and reports 0 (no object), so
    /// picking resumes on the next frame.
    pub(crate) fn complete_readback(&mut self, device: &wgpu::Device) -> Option<u32> {
        if !self.map_requested {
            return None;
        }
        let _ = device.poll(wgpu::PollType::Poll);
        match self.map_state.load(Ordering::SeqCst) {
            MAP_READY => {}
            MAP_FAILED => {
                log::warn!("pick readback map failed");
                self.map_requested = false;
                return Some(0);
            }
            _ => return None,
        }

        let raw_id = {
            let data = self.staging_buffer.slice(..4).get_mapped_range();
            u32::from_le_bytes([data[0], data[1], data[2], data[3]])
        };
        self.staging_buffer.unmap();
        self.map_requested = false;
        Some(raw_id)
    }
}
