//! Minimal prelude for SDK consumers.

pub use crate::camera::{AttitudeSample, AttitudeSource, NullAttitudeSource};
pub use crate::config::{data_path, fixture_path, loader_config, LoaderConfig, PlayerConfig};
pub use crate::data::{Frame, FrameSequence, LoadOutcome, LoadStatus, Point};
pub use crate::render::{FrameRenderer, QuadTilesRenderer};
pub use crate::sdk::PlayerBuilder;
