//! Timeline scrubber: bottom panel with play/pause and a seek slider over
//! the clock source.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::PlayerConfig;
use crate::data::FrameSequence;
use crate::playback::{ClockSource, PlaybackClock};
use crate::scene::VideoSequence;

pub fn timeline_plugin(app: &mut App) {
    app.add_systems(Update, timeline_ui_system);
}

/// Seekable range: the published playback duration, or the recording's own
/// length at the configured frame rate until the duration arrives.
fn slider_duration(source: &ClockSource, sequence: &FrameSequence, frame_rate: f32) -> f32 {
    source
        .duration_secs
        .unwrap_or_else(|| sequence.duration_secs(frame_rate))
        .max(f32::EPSILON)
}

fn timeline_ui_system(
    mut contexts: EguiContexts,
    video: Res<VideoSequence>,
    config: Res<PlayerConfig>,
    mut clock: ResMut<PlaybackClock>,
    mut source: ResMut<ClockSource>,
) {
    let Some(sequence) = video.sequence() else {
        return;
    };
    if sequence.is_empty() {
        return;
    }

    egui::TopBottomPanel::bottom("timeline")
        .frame(
            egui::Frame::default()
                .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                .inner_margin(egui::Margin::same(8))
                .corner_radius(egui::CornerRadius::same(0)),
        )
        .show(contexts.ctx_mut(), |ui| {
            ui.style_mut().override_text_style = Some(egui::TextStyle::Monospace);
            ui.visuals_mut().override_text_color = Some(egui::Color32::from_rgb(200, 220, 240));

            ui.horizontal(|ui| {
                let label = if source.playing { "Pause" } else { "Play" };
                if ui.button(label).clicked() {
                    source.playing = !source.playing;
                }

                ui.separator();

                if let Some(step) = clock.last_emitted() {
                    ui.label(
                        egui::RichText::new(format!("#{step}"))
                            .color(egui::Color32::from_rgb(100, 220, 180)),
                    );
                }

                ui.separator();

                let duration = slider_duration(&source, sequence, config.frame_rate);
                let mut elapsed = source.elapsed_secs;
                let slider = egui::Slider::new(&mut elapsed, 0.0..=duration)
                    .show_value(false)
                    .trailing_fill(true);
                if ui.add(slider).changed() {
                    // Seek: the clock re-emits whatever step the new time
                    // maps to on the next poll.
                    source.elapsed_secs = elapsed;
                    clock.reset();
                }
            });
        });
}
