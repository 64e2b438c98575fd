mod channel;
pub mod csv;
mod model;

use std::path::PathBuf;

use crossbeam_channel::Receiver;

use crate::config::LoaderConfig;

pub use channel::{init_fixture_channel, init_load_channel, CsvSource, FrameChannel, RecordBuffer};
pub use model::{Frame, FrameSequence, LoadOutcome, LoadStatus, Point};

/// Interface for sources that decode a recording off-thread.
pub trait FrameSource: Send + 'static {
    fn spawn(config: LoaderConfig, path: PathBuf) -> Receiver<LoadOutcome>;
}
