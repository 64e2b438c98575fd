//! HUD overlay: playback stats, load status, FPS counter.

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::data::LoadStatus;
use crate::playback::{ClockSource, PlaybackClock};
use crate::scene::VideoSequence;

pub fn hud_plugin(app: &mut App) {
    app.add_plugins(FrameTimeDiagnosticsPlugin)
        .add_systems(Update, hud_overlay_system);
}

fn hud_overlay_system(
    mut contexts: EguiContexts,
    video: Res<VideoSequence>,
    clock: Res<PlaybackClock>,
    source: Res<ClockSource>,
    diagnostics: Res<DiagnosticsStore>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|d| d.smoothed())
        .unwrap_or(0.0);

    egui::Window::new("Cloud Player")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .resizable(false)
        .collapsible(false)
        .title_bar(false)
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                .inner_margin(egui::Margin::same(12))
                .corner_radius(egui::CornerRadius::same(6)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            match video.sequence() {
                None => {
                    ui.label("Loading recording...");
                }
                Some(sequence) if sequence.is_empty() => {
                    ui.label(
                        egui::RichText::new("No recording loaded")
                            .color(egui::Color32::from_rgb(220, 160, 100)),
                    );
                }
                Some(sequence) => {
                    let step = clock.last_emitted().unwrap_or(0);
                    ui.label(
                        egui::RichText::new(format!("Step #{step}/{}", sequence.max_step))
                            .size(16.0)
                            .color(egui::Color32::from_rgb(100, 220, 180)),
                    );
                    ui.add_space(4.0);

                    let points = sequence.frame(step).map(|f| f.points.len()).unwrap_or(0);
                    ui.label(format!("Points  {points}"));
                    ui.label(format!("Elapsed {:.2}s", source.elapsed_secs));

                    if video.status() == Some(LoadStatus::Truncated) {
                        ui.label(
                            egui::RichText::new("Load truncated at a malformed row")
                                .color(egui::Color32::from_rgb(220, 160, 100)),
                        );
                    }
                }
            }

            ui.add_space(4.0);
            ui.separator();
            ui.label(format!("FPS  {fps:.0}"));
        });
}
