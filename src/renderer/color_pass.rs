//! Visible color pass: textured objects over a cleared background.

use std::sync::Arc;

use super::pipeline_util::{cleared_depth, object_pipeline, uniform_entry};
use crate::error::ViewerError;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::GpuTexture;

/// Pipeline, layout, sampler, and depth target for the color pass.
pub(crate) struct ColorPass {
    pub(crate) pipeline: Arc<wgpu::RenderPipeline>,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    depth: GpuTexture,
}

impl ColorPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        format: wgpu::TextureFormat,
        size: (u32, u32),
    ) -> Result<Self, ViewerError> {
        let shader = composer.compose(device, Shader::Color)?;
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Color Bind Group Layout"),
                entries: &[
                    uniform_entry(0),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                ],
            });
        let pipeline = object_pipeline(
            device,
            "Color Pipeline",
            &shader,
            &layout,
            wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            },
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Color Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            pipeline: Arc::new(pipeline),
            layout,
            sampler,
            depth: GpuTexture::depth(device, "Color Depth Texture", size),
        })
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        self.depth = GpuTexture::depth(device, "Color Depth Texture", size);
    }

    /// Bind group for one object: uniform, texture, shared sampler.
    pub(crate) fn create_bind_group(
        &self,
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        texture: &GpuTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Color Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Open the color pass on `target`. The returned pass does not borrow
    /// the encoder; drop it before finishing the encoder.
    pub(crate) fn begin(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
    ) -> wgpu::RenderPass<'static> {
        encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Color Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(cleared_depth(&self.depth.view)),
                ..Default::default()
            })
            .forget_lifetime()
    }
}
