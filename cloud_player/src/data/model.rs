// Source-agnostic frame payloads.
// CSV-specific decoding stays in csv.rs; conversion happens there.

use serde::{Deserialize, Serialize};

/// A single decoded sample: scaled world position and color in `[0, 1]`.
/// Never mutated after construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// One recorded step's points, in source order. May be empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: usize,
    pub points: Vec<Point>,
}

impl Frame {
    pub fn new(step: usize) -> Self {
        Self {
            step,
            points: Vec::new(),
        }
    }
}

/// The full recording: one frame per step in `[0, max_step]`, dense.
/// Built once at load; immutable afterward.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSequence {
    pub frames: Vec<Frame>,
    pub max_step: usize,
}

impl FrameSequence {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, step: usize) -> Option<&Frame> {
        self.frames.get(step)
    }

    /// Playback length in seconds at the given capture rate.
    pub fn duration_secs(&self, frame_rate: f32) -> f32 {
        if self.frames.is_empty() || frame_rate <= 0.0 {
            return 0.0;
        }
        (self.max_step + 1) as f32 / frame_rate
    }
}

/// Whether the load consumed the whole stream or stopped at a malformed row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Complete,
    Truncated,
}

/// What the loader thread hands back over the channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub sequence: FrameSequence,
    pub status: LoadStatus,
}

impl LoadOutcome {
    /// Missing-resource fallback: nothing loaded, playback idles.
    pub fn empty() -> Self {
        Self {
            sequence: FrameSequence::default(),
            status: LoadStatus::Complete,
        }
    }
}
