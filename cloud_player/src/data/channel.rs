use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;

use crate::config::LoaderConfig;
use crate::data::csv;
use crate::data::model::{FrameSequence, LoadOutcome, LoadStatus};
use crate::data::FrameSource;

/// Bevy resource holding the channel from the loader thread.
/// The ingest system drains this once the decode finishes.
#[derive(bevy::prelude::Resource)]
pub struct FrameChannel(pub Receiver<LoadOutcome>);

/// CSV-backed frame source: reads and decodes on a dedicated thread.
pub struct CsvSource;

impl FrameSource for CsvSource {
    fn spawn(config: LoaderConfig, path: PathBuf) -> Receiver<LoadOutcome> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            let text = match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    // Missing resource: playback idles on an empty sequence.
                    eprintln!("voluma: failed to read {}: {err}", path.display());
                    let _ = tx.send(LoadOutcome::empty());
                    return;
                }
            };
            let outcome = csv::parse_frames(text.lines(), &config);
            let note = match outcome.status {
                LoadStatus::Complete => "complete",
                LoadStatus::Truncated => "truncated",
            };
            eprintln!(
                "voluma: decoded {} frames from {} ({note})",
                outcome.sequence.frames.len(),
                path.display()
            );
            let _ = tx.send(outcome);
        });
        rx
    }
}

/// Create a frame channel and spawn the CSV decode on a dedicated thread.
pub fn init_load_channel(config: LoaderConfig, path: PathBuf) -> FrameChannel {
    FrameChannel(CsvSource::spawn(config, path))
}

/// Create a frame channel that replays a pre-decoded JSON fixture file.
pub fn init_fixture_channel(path: &Path) -> FrameChannel {
    let json = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
    let sequence: FrameSequence = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()));

    let (tx, rx) = crossbeam_channel::bounded(1);
    let _ = tx.send(LoadOutcome {
        sequence,
        status: LoadStatus::Complete,
    });
    FrameChannel(rx)
}

/// Bevy resource that serializes the decoded sequence to a fixture file,
/// so later runs can skip the CSV decode via the fixture channel.
#[derive(bevy::prelude::Resource)]
pub struct RecordBuffer {
    pub path: PathBuf,
}

impl RecordBuffer {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Serialize the sequence to the target path as JSON.
    pub fn flush(&self, sequence: &FrameSequence) {
        let json =
            serde_json::to_string(sequence).expect("failed to serialize frame sequence");
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::write(&self.path, json)
            .unwrap_or_else(|e| panic!("failed to write fixture to {}: {e}", self.path.display()));
        eprintln!(
            "voluma: recorded {} frames to {}",
            sequence.frames.len(),
            self.path.display()
        );
    }
}
