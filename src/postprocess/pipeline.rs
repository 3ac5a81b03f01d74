use wgpu::{BindGroup, BindGroupLayout, Buffer, CommandEncoder, Device, RenderPipeline, Sampler, TextureView};

use super::{
    gaussian_weights, PostProcessSettings, BLOOM_FACTORS, BRIGHT_PASS_SMOOTH_WIDTH, KERNEL_RADII,
    MAX_KERNEL_RADIUS, MIP_LEVELS,
};
use crate::core::gpu_context::GpuContext;
use crate::render::present::{draw_fullscreen, fullscreen_pipeline};
use crate::render::targets::{
    linear_sampler, mip_size, sampler_entry, texture_entry, uniform_entry, RenderTarget, SCENE_FORMAT,
};
use crate::traits::ResizeTarget;
use crate::types::{BlurUniform, BrightPassUniform, CompositeUniform, ShimmerUniform};

/// Blur uniform for one direction of one level
pub fn blur_uniform(radius: u32, direction: [f32; 2], texel_size: [f32; 2]) -> BlurUniform {
    let mut weights = [[0.0f32; 4]; 3];
    for (i, w) in gaussian_weights(radius).into_iter().take(MAX_KERNEL_RADIUS).enumerate() {
        weights[i / 4][i % 4] = w;
    }
    BlurUniform {
        direction,
        texel_size,
        kernel_radius: radius.min(MAX_KERNEL_RADIUS as u32),
        _pad: [0; 3],
        weights,
    }
}

pub fn composite_uniform(settings: &PostProcessSettings) -> CompositeUniform {
    let f = BLOOM_FACTORS;
    CompositeUniform {
        strength: settings.bloom.strength,
        radius: settings.bloom.radius,
        _pad: [0.0; 2],
        factors: [[f[0], f[1], f[2], f[3]], [f[4], 0.0, 0.0, 0.0]],
    }
}

fn uniform_buffer(device: &Device, label: &str, size: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Source texture, linear sampler, params uniform
fn source_layout(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    })
}

fn source_bind_group(
    device: &Device,
    label: &str,
    layout: &BindGroupLayout,
    source: &TextureView,
    sampler: &Sampler,
    params: &Buffer,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(source),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: params.as_entire_binding(),
            },
        ],
    })
}

/// Horizontal and vertical targets of one blur level
struct BlurLevel {
    horizontal: RenderTarget,
    vertical: RenderTarget,
    uniforms: [Buffer; 2],
    bind_groups: [BindGroup; 2],
}

impl BlurLevel {
    fn destroy(&self) {
        self.horizontal.destroy();
        self.vertical.destroy();
        for buffer in &self.uniforms {
            buffer.destroy();
        }
    }
}

/// GPU bloom and shimmer chain.
///
/// The scene target is high-passed at half resolution, blurred over five
/// successively halved levels, added back weighted per level and finally
/// rippled by the shimmer pass straight into the output view.
pub struct PostProcessor {
    gpu: GpuContext,
    sampler: Sampler,
    source_layout: BindGroupLayout,
    composite_layout: BindGroupLayout,
    bright_pipeline: RenderPipeline,
    blur_pipeline: RenderPipeline,
    composite_pipeline: RenderPipeline,
    shimmer_pipeline: RenderPipeline,
    bright_uniform: Buffer,
    composite_uniform: Buffer,
    shimmer_uniform: Buffer,
    bright: RenderTarget,
    levels: Vec<BlurLevel>,
    composite: RenderTarget,
    shimmer_bind_group: BindGroup,
    size: (u32, u32),
}

impl PostProcessor {
    pub fn new(gpu: &GpuContext, output_format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let device = gpu.device();
        let sampler = linear_sampler(device, "Post Process Sampler");

        let source_layout = source_layout(device, "Post Source Bind Group Layout");
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                texture_entry(3),
                texture_entry(4),
                texture_entry(5),
                sampler_entry(6),
                uniform_entry(7, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let bright_pipeline = fullscreen_pipeline(
            device,
            "Bright Pass Pipeline",
            include_str!("bright.wgsl"),
            &source_layout,
            SCENE_FORMAT,
            Some(wgpu::BlendState::REPLACE),
        );
        let blur_pipeline = fullscreen_pipeline(
            device,
            "Blur Pipeline",
            include_str!("blur.wgsl"),
            &source_layout,
            SCENE_FORMAT,
            Some(wgpu::BlendState::REPLACE),
        );
        let composite_pipeline = fullscreen_pipeline(
            device,
            "Composite Pipeline",
            include_str!("composite.wgsl"),
            &composite_layout,
            SCENE_FORMAT,
            Some(wgpu::BlendState::REPLACE),
        );
        let shimmer_pipeline = fullscreen_pipeline(
            device,
            "Shimmer Pipeline",
            include_str!("shimmer.wgsl"),
            &source_layout,
            output_format,
            Some(wgpu::BlendState::REPLACE),
        );

        let bright_uniform = uniform_buffer(device, "Bright Pass Uniform", std::mem::size_of::<BrightPassUniform>());
        let composite_uniform = uniform_buffer(device, "Composite Uniform", std::mem::size_of::<CompositeUniform>());
        let shimmer_uniform = uniform_buffer(device, "Shimmer Uniform", std::mem::size_of::<ShimmerUniform>());

        let (width, height) = (width.max(1), height.max(1));
        let (bright, levels) = Self::create_levels(gpu, &source_layout, &sampler, width, height);
        let composite = RenderTarget::color(device, "Composite Target", width, height, SCENE_FORMAT);
        let shimmer_bind_group = source_bind_group(
            device,
            "Shimmer Bind Group",
            &source_layout,
            &composite.view,
            &sampler,
            &shimmer_uniform,
        );

        Self {
            gpu: gpu.clone(),
            sampler,
            source_layout,
            composite_layout,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            shimmer_pipeline,
            bright_uniform,
            composite_uniform,
            shimmer_uniform,
            bright,
            levels,
            composite,
            shimmer_bind_group,
            size: (width, height),
        }
    }

    /// Bright target plus the blur chain; level 0 reads the bright target,
    /// every later level reads the previous level's vertical output
    fn create_levels(
        gpu: &GpuContext,
        layout: &BindGroupLayout,
        sampler: &Sampler,
        width: u32,
        height: u32,
    ) -> (RenderTarget, Vec<BlurLevel>) {
        let device = gpu.device();
        let (bw, bh) = mip_size(width, height, 0);
        let bright = RenderTarget::color(device, "Bright Target", bw, bh, SCENE_FORMAT);

        let mut levels: Vec<BlurLevel> = Vec::with_capacity(MIP_LEVELS);
        for (level, radius) in KERNEL_RADII.iter().copied().enumerate() {
            let (w, h) = mip_size(width, height, level);
            let horizontal = RenderTarget::color(device, "Blur Horizontal Target", w, h, SCENE_FORMAT);
            let vertical = RenderTarget::color(device, "Blur Vertical Target", w, h, SCENE_FORMAT);

            let texel = horizontal.texel_size();
            let uniforms = [[1.0, 0.0], [0.0, 1.0]].map(|direction| {
                let buffer = uniform_buffer(device, "Blur Uniform", std::mem::size_of::<BlurUniform>());
                gpu.queue()
                    .write_buffer(&buffer, 0, bytemuck::cast_slice(&[blur_uniform(radius, direction, texel)]));
                buffer
            });

            let input = match levels.last() {
                Some(previous) => &previous.vertical.view,
                None => &bright.view,
            };
            let bind_groups = [
                source_bind_group(device, "Blur Horizontal Bind Group", layout, input, sampler, &uniforms[0]),
                source_bind_group(
                    device,
                    "Blur Vertical Bind Group",
                    layout,
                    &horizontal.view,
                    sampler,
                    &uniforms[1],
                ),
            ];

            levels.push(BlurLevel {
                horizontal,
                vertical,
                uniforms,
                bind_groups,
            });
        }

        (bright, levels)
    }

    fn composite_bind_group(&self, scene: &TextureView) -> BindGroup {
        let mut entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(scene),
        }];
        entries.extend(self.levels.iter().enumerate().map(|(i, level)| wgpu::BindGroupEntry {
            binding: i as u32 + 1,
            resource: wgpu::BindingResource::TextureView(&level.vertical.view),
        }));
        entries.push(wgpu::BindGroupEntry {
            binding: 6,
            resource: wgpu::BindingResource::Sampler(&self.sampler),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: 7,
            resource: self.composite_uniform.as_entire_binding(),
        });

        self.gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Composite Bind Group"),
            layout: &self.composite_layout,
            entries: &entries,
        })
    }

    /// Record the full chain from `input` into `output`
    pub fn render(
        &self,
        encoder: &mut CommandEncoder,
        input: &TextureView,
        output: &TextureView,
        settings: &PostProcessSettings,
        time: f32,
    ) {
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        queue.write_buffer(
            &self.bright_uniform,
            0,
            bytemuck::cast_slice(&[BrightPassUniform {
                threshold: settings.bloom.threshold,
                smooth_width: BRIGHT_PASS_SMOOTH_WIDTH,
                _pad: [0.0; 2],
            }]),
        );
        queue.write_buffer(&self.composite_uniform, 0, bytemuck::cast_slice(&[composite_uniform(settings)]));
        queue.write_buffer(
            &self.shimmer_uniform,
            0,
            bytemuck::cast_slice(&[ShimmerUniform {
                time,
                intensity: settings.shimmer.intensity,
                _pad: [0.0; 2],
            }]),
        );

        let bright_bind_group = source_bind_group(
            device,
            "Bright Pass Bind Group",
            &self.source_layout,
            input,
            &self.sampler,
            &self.bright_uniform,
        );
        let clear = wgpu::LoadOp::Clear(wgpu::Color::BLACK);

        draw_fullscreen(encoder, "Bright Pass", &self.bright_pipeline, &bright_bind_group, &self.bright.view, clear);

        for level in &self.levels {
            draw_fullscreen(
                encoder,
                "Blur Horizontal Pass",
                &self.blur_pipeline,
                &level.bind_groups[0],
                &level.horizontal.view,
                clear,
            );
            draw_fullscreen(
                encoder,
                "Blur Vertical Pass",
                &self.blur_pipeline,
                &level.bind_groups[1],
                &level.vertical.view,
                clear,
            );
        }

        let composite_bind_group = self.composite_bind_group(input);
        draw_fullscreen(
            encoder,
            "Composite Pass",
            &self.composite_pipeline,
            &composite_bind_group,
            &self.composite.view,
            clear,
        );
        draw_fullscreen(encoder, "Shimmer Pass", &self.shimmer_pipeline, &self.shimmer_bind_group, output, clear);
    }

    /// Destroy every texture and uniform buffer in the chain
    pub fn release(&mut self) {
        for level in self.levels.drain(..) {
            level.destroy();
        }
        self.bright.destroy();
        self.composite.destroy();
        self.bright_uniform.destroy();
        self.composite_uniform.destroy();
        self.shimmer_uniform.destroy();
    }
}

impl ResizeTarget for PostProcessor {
    fn resize_buffers(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.size {
            return;
        }

        for level in self.levels.drain(..) {
            level.destroy();
        }
        self.bright.destroy();
        self.composite.destroy();
        let (bright, levels) = Self::create_levels(&self.gpu, &self.source_layout, &self.sampler, width, height);
        self.bright = bright;
        self.levels = levels;
        self.composite = RenderTarget::color(self.gpu.device(), "Composite Target", width, height, SCENE_FORMAT);
        self.shimmer_bind_group = source_bind_group(
            self.gpu.device(),
            "Shimmer Bind Group",
            &self.source_layout,
            &self.composite.view,
            &self.sampler,
            &self.shimmer_uniform,
        );
        self.size = (width, height);
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_uniform_packs_weights_four_per_row() {
        let u = blur_uniform(5, [1.0, 0.0], [0.5, 0.25]);
        let expected = gaussian_weights(5);
        assert_eq!(u.kernel_radius, 5);
        assert_eq!(u.weights[0], [expected[0], expected[1], expected[2], expected[3]]);
        assert_eq!(u.weights[1][0], expected[4]);
        assert_eq!(u.weights[1][1], 0.0);
        assert_eq!(u.texel_size, [0.5, 0.25]);
    }

    #[test]
    fn largest_kernel_fits() {
        let u = blur_uniform(11, [0.0, 1.0], [1.0, 1.0]);
        assert_eq!(u.kernel_radius, 11);
        assert!(u.weights[2][2] > 0.0);
        assert_eq!(u.weights[2][3], 0.0);
    }

    #[test]
    fn composite_carries_all_five_factors() {
        let u = composite_uniform(&PostProcessSettings::default());
        assert_eq!(u.factors[0], [1.0, 0.8, 0.6, 0.4]);
        assert_eq!(u.factors[1][0], 0.2);
        assert_eq!(u.strength, 0.5);
        assert_eq!(u.radius, 0.4);
    }
}
