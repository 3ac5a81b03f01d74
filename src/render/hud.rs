use winit::window::Window;

/// Numbers shown in the overlay for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub fps: f32,
    pub visual: &'static str,
    pub vertices: usize,
    pub font: &'static str,
    /// Swapchain size the overlay is laid out in
    pub resolution: (u32, u32),
    /// Render buffer size before the final upscale
    pub buffer: (u32, u32),
    pub time: f32,
}

impl HudStats {
    pub fn frame_time_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }
}

/// egui diagnostics overlay drawn on top of the presented frame
pub struct Hud {
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        stats: &HudStats,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);
        let stats = *stats;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Visual")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", stats.fps))
                            .size(24.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                    ui.label(
                        egui::RichText::new(format!("{:.2} ms", stats.frame_time_ms()))
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );

                    ui.separator();
                    ui.monospace(format!("Visual: {}", stats.visual));
                    ui.monospace(format!("Vertices: {}", stats.vertices));
                    ui.monospace(format!("Font: {}", stats.font));
                    ui.monospace(format!(
                        "Surface: {}x{}",
                        stats.resolution.0, stats.resolution.1
                    ));
                    ui.monospace(format!("Buffer: {}x{}", stats.buffer.0, stats.buffer.1));
                    ui.monospace(format!("Time: {:.2}s", stats.time));
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [stats.resolution.0, stats.resolution.1],
            pixels_per_point: full_output.pixels_per_point,
        };

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &tris,
                &screen_descriptor,
            );
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_handles_zero_fps() {
        let mut stats = HudStats {
            fps: 0.0,
            visual: "morphing",
            vertices: 0,
            font: "none",
            resolution: (1, 1),
            buffer: (1, 1),
            time: 0.0,
        };
        assert_eq!(stats.frame_time_ms(), 0.0);
        stats.fps = 50.0;
        assert_eq!(stats.frame_time_ms(), 20.0);
    }
}
