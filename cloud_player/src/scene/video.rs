//! Current-frame bookkeeping: ingest_frames system, VideoSequence resource,
//! VideoRoot/VideoTile markers.

use bevy::prelude::*;

use crate::config::PlayerConfig;
use crate::data::{FrameChannel, FrameSequence, LoadStatus, RecordBuffer};
use crate::playback::ClockSource;

/// Parent of the per-frame mesh; tilted to match the recording orientation.
#[derive(Component)]
pub struct VideoRoot;

/// Marker for the spawned frame mesh, replaced wholesale on each step.
#[derive(Component)]
pub struct VideoTile;

/// The loaded recording, installed once by the ingest system and immutable
/// afterward.
#[derive(Resource, Default)]
pub struct VideoSequence {
    sequence: Option<FrameSequence>,
    status: Option<LoadStatus>,
}

impl VideoSequence {
    pub fn sequence(&self) -> Option<&FrameSequence> {
        self.sequence.as_ref()
    }

    pub fn status(&self) -> Option<LoadStatus> {
        self.status
    }
}

/// Drains the loader channel once the decode finishes, installs the
/// sequence, and publishes the recording's duration to the clock source.
pub fn ingest_frames(
    channel: Res<FrameChannel>,
    mut video: ResMut<VideoSequence>,
    mut source: ResMut<ClockSource>,
    config: Res<PlayerConfig>,
    record: Option<Res<RecordBuffer>>,
) {
    if video.sequence.is_some() {
        return;
    }
    let Ok(outcome) = channel.0.try_recv() else {
        return;
    };

    if let Some(record) = record {
        record.flush(&outcome.sequence);
    }

    let duration = outcome.sequence.duration_secs(config.frame_rate);
    if duration > 0.0 {
        source.duration_secs = Some(duration);
    }
    eprintln!(
        "voluma: playback ready ({} frames, {duration:.1}s)",
        outcome.sequence.frames.len()
    );

    video.status = Some(outcome.status);
    video.sequence = Some(outcome.sequence);
}
