use crate::{
    camera::{Camera, CameraController},
    config::{CameraMode, Config},
    mesh,
    renderer::pipelines::aircraft::{AircraftUniforms, AMBIENT, LIGHT_COLOR, LIGHT_DIR},
    renderer::pipelines::path_line::{PathGpu, PathPipeline, PathUniforms},
    renderer::pipelines::sky::SkyUniforms,
    renderer::Renderer,
    ui,
};
use anyhow::{Context as _, Result};
use flightlog::{FlightPath, Playback, TimeRule};
use glam::{Mat4, Quat, Vec3};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::{event::WindowEvent, window::Window};

/// Trajectory polyline color.
const PATH_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,

    mode: CameraMode,
    time_rule: TimeRule,

    path: FlightPath,
    path_gpu: Option<PathGpu>,
    playback: Playback,

    /// Wall-clock origin for playback timestamps.
    epoch: Instant,
    last_frame: Instant,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;
        let camera = Camera::new(renderer.gfx.aspect());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            camera,
            controller: CameraController::new(),
            egui_ctx,
            egui_state,
            mode: config.camera,
            time_rule: config.time_rule(),
            path: FlightPath::empty(),
            path_gpu: None,
            playback: Playback::new(0.0),
            epoch: Instant::now(),
            last_frame: Instant::now(),
        })
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Loads (or reloads) a flight log, replacing the current path and GPU
    /// buffers wholesale and restarting playback from the first sample.
    ///
    /// Structural failures bubble up as errors; a path that filters down
    /// to nothing is not an error, just a warning and an Idle session.
    pub fn load_log(&mut self, log_path: &Path) -> Result<()> {
        let samples = flightlog::read_file(log_path)
            .with_context(|| format!("failed to load flight log '{}'", log_path.display()))?;
        let raw_count = samples.len();
        let path = FlightPath::from_samples(samples, self.time_rule);

        self.playback.reset(self.now_ms());

        if path.is_empty() {
            log::warn!(
                "'{}': no rows with valid coordinates ({} raw rows); nothing to play back",
                log_path.display(),
                raw_count
            );
            self.path = path;
            self.path_gpu = None;
            return Ok(());
        }

        let points: Vec<[f32; 3]> = path
            .samples()
            .iter()
            .map(|s| s.position().as_vec3().into())
            .collect();
        self.path_gpu = Some(PathPipeline::upload(&self.renderer.gfx.device, &points));

        match self.mode {
            CameraMode::Fixed => {
                // One-shot framing from the data bounds; the camera never
                // moves again for this path.
                if let Some(bounds) = path.bounds() {
                    self.camera.frame_bounds(&bounds);
                }
            }
            CameraMode::Follow => {
                self.camera.snap_to(path.samples()[0].position());
            }
        }

        log::info!(
            "loaded {} samples ({} raw rows) from '{}'",
            path.len(),
            raw_count,
            log_path.display()
        );
        self.path = path;
        Ok(())
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera.set_aspect(self.renderer.gfx.aspect());
        }
    }

    /// Forwards events to egui and, in follow mode, the orbit controller.
    /// Returns true when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        // Fixed-frame mode takes no camera input at all.
        if self.mode == CameraMode::Follow {
            self.controller.handle_event(event, &mut self.camera);
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        // Advance playback first; the camera reads the fresh transform.
        let now_ms = self.now_ms();
        let transform = self.playback.advance(&self.path, now_ms);

        let dt = self.last_frame.elapsed().as_secs_f64();
        self.last_frame = Instant::now();

        if self.mode == CameraMode::Follow && !self.path.is_empty() {
            self.camera.follow(transform.position);
        }
        self.camera.update(dt);

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj = self.camera.view_proj();

        self.renderer.sky.write_uniforms(
            &self.renderer.gfx.queue,
            &SkyUniforms {
                inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            },
        );

        self.renderer.path.write_uniforms(
            &self.renderer.gfx.queue,
            &PathUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                color: PATH_COLOR,
            },
        );

        // The fixed-frame variant keeps the model's constant base rotation;
        // heading tracking belongs to follow mode.
        let rotation = match self.mode {
            CameraMode::Fixed => Quat::IDENTITY,
            CameraMode::Follow => transform.orientation.as_quat(),
        };
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(mesh::MODEL_SCALE),
            rotation,
            transform.position.as_vec3(),
        );
        self.renderer.aircraft.write_uniforms(
            &self.renderer.gfx.queue,
            &AircraftUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                light_dir: LIGHT_DIR,
                _pad0: 0.0,
                light_color: LIGHT_COLOR,
                _pad1: 0.0,
                ambient: AMBIENT,
                _pad2: 0.0,
            },
        );

        self.renderer.render(&swap_view, self.path_gpu.as_ref());

        // HUD pass.
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        ui::draw_hud(
            &self.egui_ctx,
            self.playback.phase(&self.path),
            self.playback.index(),
            self.path.len(),
            now_ms / 1000.0,
            self.mode,
        );

        let egui_output = self.egui_ctx.end_frame();
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
