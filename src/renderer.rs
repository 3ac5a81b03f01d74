use glam::{Mat4, Vec2};
use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, CommandEncoder, Device, RenderPipeline, Sampler, Texture, TextureView,
};

use crate::core::gpu_context::GpuContext;
use crate::geometry::Geometry;
use crate::math::color::rgb_to_linear;
use crate::math::Gradient;
use crate::render::targets::{linear_sampler, texture_entry, sampler_entry, uniform_entry, RenderTarget, DEPTH_FORMAT, SCENE_FORMAT};
use crate::scene::{Material, Scene, SceneObject, Side, Transform};
use crate::traits::ResizeTarget;
use crate::types::{FrameUniform, ObjectUniform, Vertex};

/// Texels in a baked gradient strip
pub const GRADIENT_WIDTH: u32 = 256;

const SIDES: [Side; 3] = [Side::Front, Side::Back, Side::Double];

/// Interleave positions, normals and uvs; missing attributes read as zero
pub fn interleave(geometry: &Geometry) -> Vec<Vertex> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let n = geometry.normals.get(i).copied().unwrap_or_default();
            let uv = geometry.uvs.get(i).copied().unwrap_or(Vec2::ZERO);
            Vertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            }
        })
        .collect()
}

pub fn object_uniform(transform: &Transform, material: &Material) -> ObjectUniform {
    let [r, g, b] = rgb_to_linear(material.color);
    ObjectUniform {
        model: transform.matrix().to_cols_array_2d(),
        normal_matrix: Mat4::from_mat3(transform.normal_matrix()).to_cols_array_2d(),
        color: [r, g, b, material.opacity],
        params: [
            material.metalness,
            material.roughness,
            if material.gradient.is_some() { 1.0 } else { 0.0 },
            0.0,
        ],
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Front => 0,
        Side::Back => 1,
        Side::Double => 2,
    }
}

struct GpuGroup {
    start: u32,
    count: u32,
    material_index: usize,
    uniform: Buffer,
    gradient: Option<Texture>,
    bind_group: BindGroup,
}

struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    vertex_count: usize,
    index_count: usize,
    revision: u64,
    groups: Vec<GpuGroup>,
}

impl GpuMesh {
    fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        for group in &self.groups {
            group.uniform.destroy();
            if let Some(texture) = &group.gradient {
                texture.destroy();
            }
        }
    }
}

/// Draws a [`Scene`] into an HDR colour target with depth
pub struct SceneRenderer {
    gpu: GpuContext,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    object_layout: BindGroupLayout,
    /// Indexed by side, then opaque/transparent
    pipelines: [[RenderPipeline; 2]; 3],
    sampler: Sampler,
    white: Texture,
    white_view: TextureView,
    meshes: Vec<Option<GpuMesh>>,
    color: RenderTarget,
    depth: RenderTarget,
}

impl SceneRenderer {
    pub fn new(gpu: &GpuContext, width: u32, height: u32) -> Self {
        let device = gpu.device();

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let pipelines = SIDES.map(|side| {
            [false, true].map(|transparent| {
                Self::create_pipeline(device, &pipeline_layout, &shader, side, transparent)
            })
        });

        let white = Self::create_strip(gpu, "White Texture", &[255, 255, 255, 255], 1);
        let white_view = white.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            gpu: gpu.clone(),
            frame_buffer,
            frame_bind_group,
            object_layout,
            pipelines,
            sampler: linear_sampler(device, "Gradient Sampler"),
            white,
            white_view,
            meshes: Vec::new(),
            color: RenderTarget::color(device, "Scene Color Target", width, height, SCENE_FORMAT),
            depth: RenderTarget::depth(device, width, height),
        }
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        side: Side,
        transparent: bool,
    ) -> RenderPipeline {
        let cull_mode = match side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        };
        let blend = if transparent {
            wgpu::BlendState::ALPHA_BLENDING
        } else {
            wgpu::BlendState::REPLACE
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: SCENE_FORMAT,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// One-row sRGB texture
    fn create_strip(gpu: &GpuContext, label: &str, pixels: &[u8], width: u32) -> Texture {
        gpu.device().create_texture_with_data(
            gpu.queue(),
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        )
    }

    fn gradient_texture(&self, gradient: &Gradient) -> Texture {
        let pixels = gradient.to_rgba8(GRADIENT_WIDTH);
        Self::create_strip(&self.gpu, "Gradient Texture", &pixels, GRADIENT_WIDTH)
    }

    fn upload_mesh(&self, object: &SceneObject) -> GpuMesh {
        let device = self.gpu.device();
        let geometry = object.geometry();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&interleave(geometry)),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let groups = geometry
            .draw_groups()
            .into_iter()
            .map(|group| {
                let material = object.material(group.material_index);
                let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Object Uniform Buffer"),
                    contents: bytemuck::cast_slice(&[object_uniform(
                        &object.transform,
                        material.unwrap_or(&Material::default()),
                    )]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let gradient = material
                    .and_then(|m| m.gradient.as_ref())
                    .map(|g| self.gradient_texture(g));
                let gradient_view = gradient
                    .as_ref()
                    .map(|t| t.create_view(&wgpu::TextureViewDescriptor::default()));
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Object Bind Group"),
                    layout: &self.object_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(
                                gradient_view.as_ref().unwrap_or(&self.white_view),
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&self.sampler),
                        },
                    ],
                });

                GpuGroup {
                    start: group.start,
                    count: group.count,
                    material_index: group.material_index,
                    uniform,
                    gradient,
                    bind_group,
                }
            })
            .collect();

        log::debug!(
            "uploaded '{}': {} vertices, {} triangles",
            object.name,
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        GpuMesh {
            vertex_buffer,
            index_buffer,
            vertex_count: geometry.vertex_count(),
            index_count: geometry.indices.len(),
            revision: object.revision(),
            groups,
        }
    }

    /// Create buffers for new objects and refresh ones whose geometry changed
    fn sync(&mut self, scene: &Scene) {
        for (i, object) in scene.objects().iter().enumerate() {
            if i >= self.meshes.len() {
                self.meshes.push(None);
            }

            let geometry = object.geometry();
            if geometry.is_empty() {
                continue;
            }

            let stale = match &self.meshes[i] {
                None => true,
                Some(mesh) if mesh.revision == object.revision() => false,
                Some(mesh)
                    if mesh.vertex_count == geometry.vertex_count()
                        && mesh.index_count == geometry.indices.len() =>
                {
                    self.gpu.queue().write_buffer(
                        &mesh.vertex_buffer,
                        0,
                        bytemuck::cast_slice(&interleave(geometry)),
                    );
                    false
                }
                Some(_) => true,
            };

            if stale {
                if let Some(old) = self.meshes[i].take() {
                    old.destroy();
                }
                self.meshes[i] = Some(self.upload_mesh(object));
            } else if let Some(mesh) = self.meshes[i].as_mut() {
                mesh.revision = object.revision();
            }
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.iter().flatten().count()
    }

    /// Target the backdrop clears and the scene draws over
    pub fn color_view(&self) -> &TextureView {
        &self.color.view
    }

    /// Record the scene pass. `load` decides what sits behind the meshes.
    pub fn render(
        &mut self,
        encoder: &mut CommandEncoder,
        scene: &Scene,
        time: f32,
        load: wgpu::LoadOp<wgpu::Color>,
    ) {
        self.sync(scene);

        let queue = self.gpu.queue();
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[scene.frame_uniform(time)]));

        let order = scene.draw_order();
        for id in &order {
            let (Some(object), Some(Some(mesh))) = (scene.object(*id), self.meshes.get(id.0)) else {
                continue;
            };
            for group in &mesh.groups {
                if let Some(material) = object.material(group.material_index) {
                    queue.write_buffer(
                        &group.uniform,
                        0,
                        bytemuck::cast_slice(&[object_uniform(&object.transform, material)]),
                    );
                }
            }
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for id in &order {
            let (Some(object), Some(Some(mesh))) = (scene.object(*id), self.meshes.get(id.0)) else {
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for group in &mesh.groups {
                let Some(material) = object.material(group.material_index) else {
                    continue;
                };
                let pipeline = &self.pipelines[side_index(material.side)][material.transparent() as usize];
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &group.bind_group, &[]);
                render_pass.draw_indexed(group.start..group.start + group.count, 0, 0..1);
            }
        }
    }

    /// Free every mesh buffer; the renderer re-uploads if used again
    pub fn release_meshes(&mut self) {
        let count = self.mesh_count();
        for mesh in self.meshes.drain(..).flatten() {
            mesh.destroy();
        }
        log::debug!("released {} meshes", count);
    }

    /// Destroy every GPU resource; the renderer is unusable afterwards
    pub fn release(&mut self) {
        self.release_meshes();
        self.frame_buffer.destroy();
        self.white.destroy();
        self.color.destroy();
        self.depth.destroy();
    }
}

impl ResizeTarget for SceneRenderer {
    fn resize_buffers(&mut self, width: u32, height: u32) {
        let device = self.gpu.device();
        self.color = RenderTarget::color(device, "Scene Color Target", width, height, SCENE_FORMAT);
        self.depth = RenderTarget::depth(device, width, height);
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.color.size()
    }
}
