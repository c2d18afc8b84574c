//! Read-only egui overlay showing playback status.

use crate::config::CameraMode;
use flightlog::Phase;

pub fn draw_hud(
    ctx: &egui::Context,
    phase: Phase,
    index: usize,
    sample_count: usize,
    elapsed_s: f64,
    mode: CameraMode,
) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(160))
                .inner_margin(egui::Margin::same(6.0))
                .show(ui, |ui| {
                    ui.monospace(format!("playback : {phase}"));
                    if sample_count > 0 {
                        ui.monospace(format!("sample   : {}/{}", index + 1, sample_count));
                    } else {
                        ui.monospace("sample   : -");
                    }
                    ui.monospace(format!("elapsed  : {elapsed_s:.1}s"));
                    ui.monospace(format!(
                        "camera   : {}",
                        match mode {
                            CameraMode::Fixed => "fixed",
                            CameraMode::Follow => "follow (drag to orbit, scroll to zoom)",
                        }
                    ));
                });
        });
}
