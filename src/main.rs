use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use portfolio_visuals::cli::{Cli, StageConfig};
use portfolio_visuals::core::clock::SystemClock;
use portfolio_visuals::core::resize::Viewport;
use portfolio_visuals::core::run_loop::RunLoop;
use portfolio_visuals::scenes::create_visual;
use portfolio_visuals::stage::Stage;
use portfolio_visuals::traits::Visual;

struct App {
    config: StageConfig,
    window: Option<Arc<Window>>,
    stage: Option<Stage>,
    visual: Option<Box<dyn Visual>>,
    run_loop: RunLoop<SystemClock>,
}

impl App {
    fn new(config: StageConfig) -> Self {
        Self {
            config,
            window: None,
            stage: None,
            visual: None,
            run_loop: RunLoop::new(SystemClock::new()),
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if let (Some(stage), Some(visual)) = (&mut self.stage, &mut self.visual) {
            stage.resize(viewport, &mut visual.scene_mut().camera);
        }
    }

    fn teardown(&mut self) {
        if let Some(mut stage) = self.stage.take() {
            stage.teardown();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Portfolio Visuals")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let visual = create_visual(
            self.config.visual,
            self.config.color_mode,
            &self.config.font,
            u64::from(self.config.seed),
            aspect,
        );

        // Without a stage the window stays open and nothing renders
        self.stage = match pollster::block_on(Stage::mount(
            window.clone(),
            &self.config,
            self.run_loop.token(),
        )) {
            Ok(stage) => Some(stage),
            Err(e) => {
                log::error!("failed to mount stage: {:#}", e);
                None
            }
        };

        self.visual = Some(visual);
        self.window = Some(window.clone());
        self.resize(Viewport::from_physical(
            size.width,
            size.height,
            window.scale_factor(),
        ));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let the HUD handle the event first
        if let Some(stage) = &mut self.stage {
            if stage.handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = &self.window {
                    let viewport =
                        Viewport::from_physical(size.width, size.height, window.scale_factor());
                    self.resize(viewport);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    let viewport = Viewport::from_physical(size.width, size.height, scale_factor);
                    self.resize(viewport);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(frame) = self.run_loop.next_frame() else {
                    return;
                };
                let Some(visual) = self.visual.as_mut() else {
                    return;
                };
                visual.update(&frame);

                let result = match &mut self.stage {
                    Some(stage) => stage.render_frame(visual.as_ref(), &frame),
                    None => Ok(()),
                };
                if let Err(e) = result {
                    log::error!("render error: {:#}", e);
                    self.teardown();
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.stage_config();
    log::info!(
        "starting {:?} visual ({}x{}, seed {})",
        config.visual,
        config.width,
        config.height,
        config.seed
    );

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(config);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated with an error")?;

    Ok(())
}
