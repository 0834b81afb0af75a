//! [`RenderBackend`] on wgpu: two command encoders per frame, one for the
//! color pass and one for the id pass plus pixel copy.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::color_pass::ColorPass;
use super::error::{FrameError, MissingResource};
use super::pick_pass::PickPass;
use super::uniforms::{ObjectUniform, PickIdUniform};
use super::{RenderBackend, Viewport};
use crate::error::ViewerError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::GpuTexture;
use crate::scene::{MeshData, ObjectId, TextureData};

/// GPU handles for one scene object.
///
/// Every handle is optional so partially built objects can live in the
/// scene; drawing such an object is skipped with a warning.
#[derive(Default)]
pub struct GpuObjectResources {
    /// Color-pass pipeline.
    pub color_pipeline: Option<Arc<wgpu::RenderPipeline>>,
    /// Pick-pass pipeline.
    pub pick_pipeline: Option<Arc<wgpu::RenderPipeline>>,
    /// Interleaved [`Vertex`](crate::scene::Vertex) buffer.
    pub vertex_buffer: Option<wgpu::Buffer>,
    /// Number of vertices to draw.
    pub vertex_count: u32,
    /// Per-object [`ObjectUniform`] buffer.
    pub uniform_buffer: Option<wgpu::Buffer>,
    /// Uniform, texture, sampler.
    pub color_bind_group: Option<wgpu::BindGroup>,
    /// Uniform, object id.
    pub pick_bind_group: Option<wgpu::BindGroup>,
}

impl GpuObjectResources {
    fn vertices(&self) -> Result<(&wgpu::Buffer, u32), MissingResource> {
        match &self.vertex_buffer {
            Some(buffer) if self.vertex_count > 0 => {
                Ok((buffer, self.vertex_count))
            }
            _ => Err(MissingResource::VertexBuffer),
        }
    }
}

/// In-progress wgpu frame.
pub struct GpuFrame {
    output: wgpu::SurfaceTexture,
    color_encoder: wgpu::CommandEncoder,
    pick_encoder: wgpu::CommandEncoder,
    color_pass: Option<wgpu::RenderPass<'static>>,
    pick_pass: Option<wgpu::RenderPass<'static>>,
}

/// wgpu implementation of [`RenderBackend`].
pub struct WgpuBackend {
    context: RenderContext,
    color: ColorPass,
    pick: PickPass,
    /// 1×1 grey texture for objects without one.
    fallback_texture: GpuTexture,
    scale_factor: f32,
}

impl WgpuBackend {
    /// Build pipelines and render targets for `context`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a shader fails to compose.
    pub fn new(
        context: RenderContext,
        scale_factor: f32,
    ) -> Result<Self, ViewerError> {
        let mut composer = ShaderComposer::new()?;
        let size = context.size();
        let color =
            ColorPass::new(&context.device, &mut composer, context.format(), size)?;
        let pick = PickPass::new(&context.device, &mut composer, size)?;
        let fallback_texture = GpuTexture::from_data(
            &context.device,
            &context.queue,
            "Fallback Texture",
            &TextureData::grey(),
        );
        log::info!(
            "wgpu backend ready: {}x{} {:?}",
            size.0,
            size.1,
            context.format()
        );
        Ok(Self {
            context,
            color,
            pick,
            fallback_texture,
            scale_factor,
        })
    }

    /// The underlying render context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Upload a mesh (and optional texture) and build every handle needed
    /// to draw it with id `id`.
    #[must_use]
    pub fn create_object_resources(
        &self,
        id: ObjectId,
        mesh: &MeshData,
        texture: Option<&TextureData>,
    ) -> GpuObjectResources {
        let device = &self.context.device;
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Object Vertex Buffer"),
                contents: mesh.as_bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Object Uniform Buffer"),
                contents: bytemuck::bytes_of(&ObjectUniform::default()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let id_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Object Pick Id Buffer"),
                contents: bytemuck::bytes_of(&PickIdUniform::new(id.get())),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let owned_texture = texture.map(|data| {
            GpuTexture::from_data(device, &self.context.queue, "Object Texture", data)
        });
        let texture = owned_texture.as_ref().unwrap_or(&self.fallback_texture);

        GpuObjectResources {
            color_pipeline: Some(Arc::clone(&self.color.pipeline)),
            pick_pipeline: Some(Arc::clone(&self.pick.pipeline)),
            color_bind_group: Some(self.color.create_bind_group(
                device,
                &uniform_buffer,
                texture,
            )),
            pick_bind_group: Some(self.pick.create_bind_group(
                device,
                &uniform_buffer,
                &id_buffer,
            )),
            vertex_buffer: Some(vertex_buffer),
            vertex_count: mesh.vertex_count(),
            uniform_buffer: Some(uniform_buffer),
        }
    }

    /// Update the logical→physical scale used for pointer picking.
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }
}

impl RenderBackend for WgpuBackend {
    type Resources = GpuObjectResources;
    type Frame = GpuFrame;

    fn viewport(&self) -> Viewport {
        let (width, height) = self.context.size();
        Viewport::new(width, height, self.scale_factor)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.scale_factor = viewport.scale_factor;
        if viewport.width == 0 || viewport.height == 0 {
            return;
        }
        if self.context.size() == (viewport.width, viewport.height) {
            self.context.reconfigure();
            return;
        }
        self.context.resize(viewport.width, viewport.height);
        let size = (viewport.width, viewport.height);
        self.color.resize(&self.context.device, size);
        self.pick
            .resize(&self.context.device, viewport.width, viewport.height);
    }

    fn begin_frame(
        &mut self,
        clear: wgpu::Color,
    ) -> Result<GpuFrame, FrameError> {
        let output = self.context.get_next_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut color_encoder = self.context.create_encoder("Color Encoder");
        let color_pass = self.color.begin(&mut color_encoder, &view, clear);
        Ok(GpuFrame {
            output,
            color_encoder,
            pick_encoder: self.context.create_encoder("Picking Encoder"),
            color_pass: Some(color_pass),
            pick_pass: None,
        })
    }

    fn write_uniforms(
        &mut self,
        resources: &GpuObjectResources,
        uniform: &ObjectUniform,
    ) -> Result<(), MissingResource> {
        let buffer = resources
            .uniform_buffer
            .as_ref()
            .ok_or(MissingResource::UniformBuffer)?;
        self.context
            .queue
            .write_buffer(buffer, 0, bytemuck::bytes_of(uniform));
        Ok(())
    }

    fn draw_color(
        &mut self,
        frame: &mut GpuFrame,
        resources: &GpuObjectResources,
    ) -> Result<(), MissingResource> {
        let pipeline = resources
            .color_pipeline
            .as_deref()
            .ok_or(MissingResource::ColorPipeline)?;
        let bind_group = resources
            .color_bind_group
            .as_ref()
            .ok_or(MissingResource::ColorBindGroup)?;
        let (vertex_buffer, count) = resources.vertices()?;
        if let Some(pass) = frame.color_pass.as_mut() {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..count, 0..1);
        }
        Ok(())
    }

    fn begin_pick_pass(&mut self, frame: &mut GpuFrame) {
        frame.color_pass = None;
        frame.pick_pass = Some(self.pick.begin(&mut frame.pick_encoder));
    }

    fn draw_pick(
        &mut self,
        frame: &mut GpuFrame,
        resources: &GpuObjectResources,
    ) -> Result<(), MissingResource> {
        let pipeline = resources
            .pick_pipeline
            .as_deref()
            .ok_or(MissingResource::PickPipeline)?;
        let bind_group = resources
            .pick_bind_group
            .as_ref()
            .ok_or(MissingResource::PickBindGroup)?;
        let (vertex_buffer, count) = resources.vertices()?;
        if let Some(pass) = frame.pick_pass.as_mut() {
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..count, 0..1);
        }
        Ok(())
    }

    fn copy_pick_pixel(&mut self, frame: &mut GpuFrame, x: u32, y: u32) {
        frame.pick_pass = None;
        self.pick
            .copy_pixel_to_staging(&mut frame.pick_encoder, x, y);
    }

    fn end_frame(&mut self, frame: GpuFrame) {
        let GpuFrame {
            output,
            color_encoder,
            pick_encoder,
            color_pass,
            pick_pass,
        } = frame;
        // Passes must end before their encoders finish.
        drop(color_pass);
        drop(pick_pass);
        self.context.submit([color_encoder, pick_encoder]);
        output.present();
    }

    fn request_pick_readback(&mut self) {
        self.pick.start_readback();
    }

    fn poll_pick_readback(&mut self) -> Option<u32> {
        self.pick.complete_readback(&self.context.device)
    }
}
