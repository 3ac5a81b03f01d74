use wgpu::{BindGroup, BindGroupLayout, CommandEncoder, Device, RenderPipeline, Sampler, TextureView};

use super::targets::{linear_sampler, sampler_entry, texture_entry};

/// Render pipeline that draws one fullscreen triangle with `shader_source`
pub fn fullscreen_pipeline(
    device: &Device,
    label: &str,
    shader_source: &str,
    layout: &BindGroupLayout,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Record a pass that draws the fullscreen triangle into `target`
pub fn draw_fullscreen(
    encoder: &mut CommandEncoder,
    label: &str,
    pipeline: &RenderPipeline,
    bind_group: &BindGroup,
    target: &TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    render_pass.set_pipeline(pipeline);
    render_pass.set_bind_group(0, bind_group, &[]);
    render_pass.draw(0..3, 0..1);
}

/// Copies a texture onto a target of `format` through a linear sampler
pub struct Presenter {
    pipeline: RenderPipeline,
    layout: BindGroupLayout,
    sampler: Sampler,
}

impl Presenter {
    pub fn new(device: &Device, format: wgpu::TextureFormat) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });
        let pipeline = fullscreen_pipeline(
            device,
            "Present Pipeline",
            include_str!("../display.wgsl"),
            &layout,
            format,
            Some(wgpu::BlendState::REPLACE),
        );

        Self {
            pipeline,
            layout,
            sampler: linear_sampler(device, "Present Sampler"),
        }
    }

    /// Bind group sampling `source`; rebuild whenever the source is recreated
    pub fn bind(&self, device: &Device, source: &TextureView) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Present Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    pub fn draw(
        &self,
        encoder: &mut CommandEncoder,
        bind_group: &BindGroup,
        target: &TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
    ) {
        draw_fullscreen(encoder, "Present Pass", &self.pipeline, bind_group, target, load);
    }
}
