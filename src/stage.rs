//! The stage owns every GPU resource of a mounted visual: surface, scene
//! renderer, post-processing chain, backdrop and HUD. Visuals only own
//! their CPU-side scene and are handed in per frame.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use winit::window::Window;

use crate::camera::Camera;
use crate::cli::StageConfig;
use crate::core::canvas_layer::BlobField;
use crate::core::gpu_context::GpuContext;
use crate::core::resize::{ResizeAdapter, Viewport};
use crate::core::run_loop::CancelToken;
use crate::core::timer::FpsCounter;
use crate::frame::FrameInfo;
use crate::postprocess::PostProcessor;
use crate::render::backdrop::fill_color;
use crate::render::{BackdropRenderer, Hud, HudStats, Presenter};
use crate::renderer::SceneRenderer;
use crate::traits::{ResizeTarget, Visual};

pub struct Stage {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    scene_renderer: SceneRenderer,
    post: PostProcessor,
    presenter: Presenter,
    present_bind_group: wgpu::BindGroup,
    backdrop: Option<BackdropRenderer>,
    hud: Option<Hud>,
    resize: ResizeAdapter,
    max_surface_dimension: u32,
    token: CancelToken,
    fps: FpsCounter,
    torn_down: bool,
}

impl Stage {
    /// Acquire adapter, device and surface for `window` and build every pass.
    ///
    /// `token` is cancelled on teardown so the host's run loop stops too.
    pub async fn mount(window: Arc<Window>, config: &StageConfig, token: CancelToken) -> anyhow::Result<Self> {
        let instance = GpuContext::instance();
        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface)
            .await
            .map_err(|e| anyhow!(e.to_string()))
            .context("failed to acquire GPU device")?;

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        let (width, height) = viewport.buffer_size();
        let max_surface_dimension = gpu.device().limits().max_texture_dimension_2d;
        let (surface_width, surface_height) = viewport.surface_size(max_surface_dimension);

        let surface_config = gpu
            .surface_config(&surface, surface_width, surface_height)
            .map_err(|e| anyhow!(e.to_string()))
            .context("failed to configure surface")?;
        surface.configure(gpu.device(), &surface_config);

        let scene_renderer = SceneRenderer::new(&gpu, width, height);
        let post = PostProcessor::new(&gpu, surface_config.format, width, height);
        let presenter = Presenter::new(gpu.device(), surface_config.format);
        let present_bind_group = presenter.bind(gpu.device(), scene_renderer.color_view());

        let backdrop = config.backdrop.then(|| {
            let field = BlobField::new(
                viewport.width.max(1.0) as f32,
                viewport.height.max(1.0) as f32,
                u64::from(config.seed),
            );
            BackdropRenderer::new(&gpu, field, width, height)
        });
        let hud = config
            .hud
            .then(|| Hud::new(&window, gpu.device(), surface_config.format));

        log::info!(
            "mounted {:?} on {}, surface {:?} {}x{}, buffers {}x{}",
            config.visual,
            gpu.adapter_name(),
            surface_config.format,
            surface_config.width,
            surface_config.height,
            width,
            height
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            scene_renderer,
            post,
            presenter,
            present_bind_group,
            backdrop,
            hud,
            resize: ResizeAdapter::new(),
            max_surface_dimension,
            token,
            fps: FpsCounter::default(),
            torn_down: false,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Current physical render buffer size
    pub fn buffer_size(&self) -> (u32, u32) {
        self.scene_renderer.buffer_size()
    }

    /// Current swapchain size; at least the buffer size
    pub fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Returns true when the HUD consumed the event
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        match &mut self.hud {
            Some(hud) => hud.handle_event(&self.window, event),
            None => false,
        }
    }

    /// Resize camera, render targets and surface together. Render targets
    /// follow the capped buffer size, the surface the full window size.
    pub fn resize(&mut self, viewport: Viewport, camera: &mut Camera) -> bool {
        let mut targets: Vec<&mut dyn ResizeTarget> = vec![&mut self.scene_renderer, &mut self.post];
        if let Some(backdrop) = self.backdrop.as_mut() {
            targets.push(backdrop);
        }
        if !self.resize.resize(viewport, camera, &mut targets) {
            return false;
        }

        let (width, height) = viewport.surface_size(self.max_surface_dimension);
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);

        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.set_logical_size(viewport.width as f32, viewport.height as f32);
        }
        self.present_bind_group = self
            .presenter
            .bind(self.gpu.device(), self.scene_renderer.color_view());
        true
    }

    /// Render and present one frame of `visual`.
    ///
    /// Surface loss and timeouts skip the frame; only an out-of-memory
    /// surface is returned as an error.
    pub fn render_frame(&mut self, visual: &dyn Visual, frame: &FrameInfo) -> anyhow::Result<()> {
        if self.torn_down {
            return Ok(());
        }

        if let Some(fps) = self.fps.frame(frame.delta) {
            log::debug!("{:.1} fps ({})", fps, visual.name());
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::trace!("surface timeout, skipping frame {}", frame.number);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow!("surface out of memory"));
            }
            Err(e) => {
                log::warn!("skipping frame {}: {}", frame.number, e);
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let load = match self.backdrop.as_mut() {
            Some(backdrop) => {
                backdrop.update(frame.delta);
                backdrop.draw(&mut encoder, self.scene_renderer.color_view());
                wgpu::LoadOp::Load
            }
            None => wgpu::LoadOp::Clear(fill_color()),
        };
        self.scene_renderer
            .render(&mut encoder, visual.scene(), frame.time, load);

        match visual.post_process() {
            Some(settings) => self.post.render(
                &mut encoder,
                self.scene_renderer.color_view(),
                &view,
                &settings,
                frame.time,
            ),
            None => self.presenter.draw(
                &mut encoder,
                &self.present_bind_group,
                &view,
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            ),
        }

        let resolution = self.surface_size();
        let buffer = self.buffer_size();
        if let Some(hud) = self.hud.as_mut() {
            let stats = HudStats {
                fps: self.fps.fps(),
                visual: visual.name(),
                vertices: visual.scene().vertex_count(),
                font: visual.font_state(),
                resolution,
                buffer,
                time: frame.time,
            };
            hud.render(
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &self.window,
                &view,
                &stats,
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        log::trace!("frame {} at {:.3}s", frame.number, frame.time);
        Ok(())
    }

    /// Stop the run loop, detach resizing and destroy every GPU buffer and
    /// texture. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.token.cancel();
        self.resize.detach();
        self.scene_renderer.release();
        self.post.release();
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.release();
        }

        log::info!("stage torn down");
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.teardown();
    }
}
