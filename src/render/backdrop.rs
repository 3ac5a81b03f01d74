use wgpu::{BindGroup, CommandEncoder, Texture, TextureView};

use super::present::Presenter;
use super::targets::{RenderTarget, SCENE_FORMAT};
use crate::core::canvas_layer::{BlobField, BACKDROP_DOWNSCALE, BACKDROP_FILL};
use crate::core::display_context::DisplayContext;
use crate::core::gpu_context::GpuContext;
use crate::core::layer::TimedLayer;
use crate::math::color::srgb_to_linear;
use crate::traits::ResizeTarget;

/// Blob field refresh rate
pub const BACKDROP_HZ: f32 = 60.0;

/// Clear colour matching the backdrop fill, for frames drawn without it
pub fn fill_color() -> wgpu::Color {
    let [r, g, b] = BACKDROP_FILL.map(|c| srgb_to_linear(c as f32 / 255.0) as f64);
    wgpu::Color { r, g, b, a: 1.0 }
}

/// Uploads the CPU blob field at reduced resolution and stretches it over
/// the scene target; linear filtering stands in for a heavy blur.
pub struct BackdropRenderer {
    gpu: GpuContext,
    layer: TimedLayer<BlobField>,
    presenter: Presenter,
    size: (u32, u32),
    context: DisplayContext,
    texture: RenderTarget,
    bind_group: BindGroup,
    dirty: bool,
}

impl BackdropRenderer {
    pub fn new(gpu: &GpuContext, field: BlobField, width: u32, height: u32) -> Self {
        let presenter = Presenter::new(gpu.device(), SCENE_FORMAT);
        let context = DisplayContext::new(width, height).downscaled(BACKDROP_DOWNSCALE);
        let texture = Self::create_texture(gpu, context);
        let bind_group = presenter.bind(gpu.device(), &texture.view);

        Self {
            gpu: gpu.clone(),
            layer: TimedLayer::new(field, BACKDROP_HZ),
            presenter,
            size: (width, height),
            context,
            texture,
            bind_group,
            dirty: true,
        }
    }

    fn create_texture(gpu: &GpuContext, context: DisplayContext) -> RenderTarget {
        RenderTarget::new(
            gpu.device(),
            "Backdrop Texture",
            context.width,
            context.height,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        )
    }

    pub fn field(&self) -> &BlobField {
        self.layer.logic()
    }

    /// Blobs bounce within the logical viewport
    pub fn set_logical_size(&mut self, width: f32, height: f32) {
        self.layer.logic_mut().set_size(width, height);
        self.dirty = true;
    }

    pub fn update(&mut self, delta: f32) {
        if self.layer.update(delta) {
            self.dirty = true;
        }
    }

    pub fn release(&mut self) {
        self.texture.destroy();
    }

    /// Clear `target` with the backdrop
    pub fn draw(&mut self, encoder: &mut CommandEncoder, target: &TextureView) {
        if self.dirty {
            let output = self.layer.render(&self.context);
            upload(&self.gpu, &self.texture.texture, &output.pixels, self.context);
            self.dirty = false;
        }

        self.presenter
            .draw(encoder, &self.bind_group, target, wgpu::LoadOp::Clear(fill_color()));
    }
}

fn upload(gpu: &GpuContext, texture: &Texture, pixels: &[u8], context: DisplayContext) {
    if pixels.len() != context.buffer_size() {
        log::warn!(
            "backdrop buffer is {} bytes, expected {}",
            pixels.len(),
            context.buffer_size()
        );
        return;
    }

    gpu.queue().write_texture(
        texture.as_image_copy(),
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * context.width),
            rows_per_image: Some(context.height),
        },
        wgpu::Extent3d {
            width: context.width,
            height: context.height,
            depth_or_array_layers: 1,
        },
    );
}

impl ResizeTarget for BackdropRenderer {
    fn resize_buffers(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        let context = DisplayContext::new(width, height).downscaled(BACKDROP_DOWNSCALE);
        if context == self.context {
            return;
        }

        self.context = context;
        self.texture.destroy();
        self.texture = Self::create_texture(&self.gpu, context);
        self.bind_group = self.presenter.bind(self.gpu.device(), &self.texture.view);
        self.dirty = true;
    }

    fn buffer_size(&self) -> (u32, u32) {
        self.size
    }
}
