//! Playback clock: maps the audio-clock signal to discrete frame steps.
//!
//! The clock is polled every `Update` but emits a step at most once, so the
//! mesh rebuild cost is paid once per distinct step no matter how often the
//! poll runs. Looping and out-of-range handling live in the driving system;
//! `PlaybackClock::advance` stays callable from any scheduler.

use bevy::prelude::*;

use crate::config::DEFAULT_FRAME_RATE;
use crate::render::RendererResource;
use crate::scene::{VideoRoot, VideoSequence, VideoTile};

/// Read-only playback signal consumed by the clock. Stands in for the audio
/// backend: a real player would write `elapsed_secs` / `playing` /
/// `duration_secs` here from its own decode position.
#[derive(Resource)]
pub struct ClockSource {
    pub elapsed_secs: f32,
    pub playing: bool,
    pub duration_secs: Option<f32>,
}

impl Default for ClockSource {
    fn default() -> Self {
        Self {
            elapsed_secs: 0.0,
            playing: true,
            duration_secs: None,
        }
    }
}

/// Maps elapsed time to a step index, suppressing repeats.
#[derive(Resource, Debug)]
pub struct PlaybackClock {
    frame_rate: f32,
    last_emitted: Option<usize>,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl PlaybackClock {
    pub fn new(frame_rate: f32) -> Self {
        Self {
            frame_rate,
            last_emitted: None,
        }
    }

    /// Returns `Some(step)` only when the computed step differs from the
    /// previously emitted one and lies within `[0, max_step]`. Candidates
    /// beyond `max_step` are recorded but suppressed: the rebuild is
    /// skipped and the caller is expected to loop the time source.
    /// Returns `None` unconditionally while the source is not playing.
    pub fn advance(&mut self, elapsed_secs: f32, playing: bool, max_step: usize) -> Option<usize> {
        if !playing {
            return None;
        }
        let candidate = (elapsed_secs * self.frame_rate).floor().max(0.0) as usize;
        if self.last_emitted == Some(candidate) {
            return None;
        }
        self.last_emitted = Some(candidate);
        if candidate > max_step {
            return None;
        }
        Some(candidate)
    }

    pub fn last_emitted(&self) -> Option<usize> {
        self.last_emitted
    }

    /// True once the final step has been emitted; the driver loops then.
    pub fn reached_end(&self, max_step: usize) -> bool {
        self.last_emitted.is_some_and(|step| step >= max_step)
    }

    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

pub fn playback_plugin(app: &mut App) {
    app.init_resource::<ClockSource>()
        .init_resource::<PlaybackClock>()
        .add_systems(Update, (drive_clock_source, advance_playback).chain());
}

/// Advances the stand-in audio position. With a real audio backend this
/// system is replaced by whatever writes the decode position.
fn drive_clock_source(time: Res<Time>, mut source: ResMut<ClockSource>) {
    if source.playing {
        source.elapsed_secs += time.delta_secs();
    }
}

/// Fast driver: poll the clock and swap the frame mesh on step changes.
fn advance_playback(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut source: ResMut<ClockSource>,
    mut clock: ResMut<PlaybackClock>,
    video: Res<VideoSequence>,
    renderer: Res<RendererResource>,
    video_root: Query<Entity, With<VideoRoot>>,
    tiles: Query<Entity, With<VideoTile>>,
) {
    let Some(sequence) = video.sequence() else {
        return;
    };
    if sequence.is_empty() {
        // Missing-resource steady state: nothing renders, nothing crashes.
        return;
    }

    // A single-frame recording has nowhere to loop to; resetting would
    // re-emit step 0 every poll and rebuild the same mesh endlessly.
    if sequence.max_step > 0 && clock.reached_end(sequence.max_step) {
        source.elapsed_secs = 0.0;
        clock.reset();
    }

    let Some(step) = clock.advance(source.elapsed_secs, source.playing, sequence.max_step) else {
        return;
    };
    let Ok(root) = video_root.get_single() else {
        return;
    };
    let (Some(frame), Some(fallback)) = (sequence.frame(step), sequence.frame(0)) else {
        return;
    };

    for tile in &tiles {
        commands.entity(tile).despawn();
    }
    renderer
        .0
        .spawn_frame(&mut commands, &mut meshes, &mut materials, root, frame, fallback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_polls_within_one_step_emit_once() {
        let mut clock = PlaybackClock::new(30.0);

        assert_eq!(clock.advance(0.001, true, 100), Some(0));
        assert_eq!(clock.advance(0.010, true, 100), None);
        assert_eq!(clock.advance(0.032, true, 100), None);
        // Crossing the 1/30s boundary emits the next step exactly once.
        assert_eq!(clock.advance(0.034, true, 100), Some(1));
        assert_eq!(clock.advance(0.040, true, 100), None);
    }

    #[test]
    fn paused_source_never_emits() {
        let mut clock = PlaybackClock::new(30.0);

        assert_eq!(clock.advance(0.5, false, 100), None);
        assert_eq!(clock.advance(1.5, false, 100), None);
        assert_eq!(clock.last_emitted(), None);
    }

    #[test]
    fn out_of_range_steps_skip_the_rebuild() {
        let mut clock = PlaybackClock::new(30.0);

        // 2.0s at 30fps is step 60, beyond a 10-step recording.
        assert_eq!(clock.advance(2.0, true, 10), None);
        assert_eq!(clock.last_emitted(), Some(60));
        assert!(clock.reached_end(10));
    }

    #[test]
    fn reset_after_loop_re_emits_step_zero() {
        let mut clock = PlaybackClock::new(30.0);

        assert_eq!(clock.advance(0.35, true, 10), Some(10));
        assert!(clock.reached_end(10));

        clock.reset();
        assert_eq!(clock.advance(0.0, true, 10), Some(0));
    }

    #[test]
    fn steps_track_the_frame_rate() {
        let mut clock = PlaybackClock::new(10.0);

        assert_eq!(clock.advance(0.95, true, 100), Some(9));
        assert_eq!(clock.advance(1.05, true, 100), Some(10));
    }

    mod driver {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        use super::*;
        use crate::config::PlayerConfig;
        use crate::data::{Frame, FrameChannel, FrameSequence, LoadOutcome, LoadStatus};
        use crate::render::FrameRenderer;
        use crate::scene::ingest_frames;

        struct CountingRenderer(Arc<AtomicUsize>);

        impl FrameRenderer for CountingRenderer {
            fn spawn_frame(
                &self,
                _commands: &mut Commands,
                _meshes: &mut ResMut<Assets<Mesh>>,
                _materials: &mut ResMut<Assets<StandardMaterial>>,
                _video_root: Entity,
                _frame: &Frame,
                _fallback: &Frame,
            ) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        #[test]
        fn single_step_recording_rebuilds_once() {
            let (tx, rx) = crossbeam_channel::bounded(1);
            tx.send(LoadOutcome {
                sequence: FrameSequence {
                    frames: vec![Frame::new(0)],
                    max_step: 0,
                },
                status: LoadStatus::Complete,
            })
            .unwrap();

            let rebuilds = Arc::new(AtomicUsize::new(0));
            let mut app = App::new();
            app.insert_resource(Assets::<Mesh>::default())
                .insert_resource(Assets::<StandardMaterial>::default())
                .insert_resource(FrameChannel(rx))
                .insert_resource(VideoSequence::default())
                .insert_resource(ClockSource::default())
                .insert_resource(PlaybackClock::new(30.0))
                .insert_resource(PlayerConfig::default())
                .insert_resource(RendererResource(Box::new(CountingRenderer(
                    rebuilds.clone(),
                ))))
                .add_systems(Update, (ingest_frames, advance_playback).chain());
            app.world_mut()
                .spawn((Transform::default(), Visibility::default(), VideoRoot));

            for poll in 0..5 {
                app.world_mut().resource_mut::<ClockSource>().elapsed_secs =
                    poll as f32 * 0.2;
                app.update();
            }

            assert_eq!(rebuilds.load(Ordering::SeqCst), 1);
        }
    }
}
