//! SDK entry points and builder for composing the player app.

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use crossbeam_channel::Receiver;

use crate::camera::{
    attitude_camera_plugin, AttitudeChannel, AttitudeSample, AttitudeSource, NullAttitudeSource,
};
use crate::config::{self, PlayerConfig};
use crate::data::{init_fixture_channel, init_load_channel, RecordBuffer};
use crate::gaze::{gaze_plugin, GazeTimer};
use crate::playback::{playback_plugin, PlaybackClock};
use crate::render::{FrameRenderer, QuadTilesRenderer, RendererResource};
use crate::scene::{ingest_frames, setup_scene};
use crate::ui::{hud_plugin, timeline_plugin};

/// Builder for constructing a Voluma app with customizable plugins.
pub struct PlayerBuilder {
    config: Option<PlayerConfig>,
    data_path: Option<PathBuf>,
    fixture_path: Option<PathBuf>,
    record_fixture: Option<PathBuf>,
    renderer: Option<Box<dyn FrameRenderer>>,
    attitude: Option<Receiver<AttitudeSample>>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    enable_orientation: bool,
    enable_gaze: bool,
    enable_hud: bool,
    enable_timeline: bool,
}

impl Default for PlayerBuilder {
    fn default() -> Self {
        Self {
            config: None,
            data_path: None,
            fixture_path: None,
            record_fixture: None,
            renderer: None,
            attitude: None,
            window_title: "Voluma".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Color::BLACK,
            enable_orientation: true,
            enable_gaze: true,
            enable_hud: true,
            enable_timeline: true,
        }
    }
}

impl PlayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of reading the environment.
    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Decode this CSV instead of the `CLOUD_CSV`/default path.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Replay a pre-decoded JSON fixture instead of decoding CSV.
    pub fn fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    /// Write the decoded sequence to a JSON fixture once the load finishes.
    pub fn record_fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.record_fixture = Some(path.into());
        self
    }

    /// Provide a custom frame renderer implementation.
    pub fn renderer(mut self, renderer: impl FrameRenderer) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Feed attitude samples from an external sensor backend.
    pub fn attitude_source(mut self, receiver: Receiver<AttitudeSample>) -> Self {
        self.attitude = Some(receiver);
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn disable_orientation(mut self) -> Self {
        self.enable_orientation = false;
        self
    }

    pub fn disable_gaze(mut self) -> Self {
        self.enable_gaze = false;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    pub fn disable_timeline(mut self) -> Self {
        self.enable_timeline = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let config = self.config.unwrap_or_else(PlayerConfig::from_env);

        let fixture = self.fixture_path.or_else(config::fixture_path);
        let channel = match fixture {
            Some(path) => init_fixture_channel(&path),
            None => init_load_channel(
                config.loader.clone(),
                self.data_path.unwrap_or_else(config::data_path),
            ),
        };

        let renderer = self
            .renderer
            .unwrap_or_else(|| Box::new(QuadTilesRenderer::new(config.surface_size())));
        let attitude = self.attitude.unwrap_or_else(|| {
            NullAttitudeSource::spawn(Duration::from_secs_f32(config.sensor_sample_interval))
        });

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(channel)
        .insert_resource(PlaybackClock::new(config.frame_rate))
        .insert_resource(GazeTimer(Timer::from_seconds(
            config.dwell_tick_interval,
            TimerMode::Repeating,
        )))
        .insert_resource(AttitudeChannel(attitude))
        .insert_resource(config)
        .add_plugins(playback_plugin)
        .add_systems(Startup, setup_scene)
        .add_systems(Update, ingest_frames);

        renderer.setup(&mut app);
        app.insert_resource(RendererResource(renderer));

        if let Some(path) = self.record_fixture {
            app.insert_resource(RecordBuffer::new(path));
        }

        if self.enable_orientation {
            app.add_plugins(attitude_camera_plugin);
        }
        if self.enable_gaze {
            app.add_plugins(gaze_plugin);
        }
        if self.enable_hud || self.enable_timeline {
            app.add_plugins(EguiPlugin);
        }
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }
        if self.enable_timeline {
            app.add_plugins(timeline_plugin);
        }

        app
    }
}
