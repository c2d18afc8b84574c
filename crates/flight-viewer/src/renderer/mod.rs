//! The main rendering orchestrator. Owns the GPU context, the depth
//! target, and the individual render pass pipelines.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{
    context::GfxContext,
    pipelines::{
        aircraft::AircraftPipeline,
        path_line::{PathGpu, PathPipeline},
        sky::SkyPipeline,
    },
    targets::DepthTarget,
};
use std::sync::Arc;
use winit::window::Window;

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub depth: DepthTarget,
    pub sky: SkyPipeline,
    pub path: PathPipeline,
    pub aircraft: AircraftPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let size = gfx.size;

        let depth = DepthTarget::new(&gfx.device, size);
        let sky = SkyPipeline::new(&gfx.device, gfx.config.format, depth.format);
        let path = PathPipeline::new(&gfx.device, gfx.config.format, depth.format);
        let aircraft = AircraftPipeline::new(&gfx.device, gfx.config.format, depth.format);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            depth,
            sky,
            path,
            aircraft,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.depth.resize(&self.gfx.device, new_size);
        }
    }

    /// Records and submits the geometry pass: sky, then trajectory, then
    /// the airplane. Uniforms are written by the caller beforehand.
    pub fn render(&mut self, swap_view: &wgpu::TextureView, path: Option<&PathGpu>) {
        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.0,
                            b: 0.0,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
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

            self.sky.draw(&mut pass);
            if let Some(path) = path {
                self.path.draw(&mut pass, path);
            }
            self.aircraft.draw(&mut pass);
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
