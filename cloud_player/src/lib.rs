//! Volumetric video player — replays recorded depth-camera point clouds as
//! quad-tile meshes with gaze selection and attitude-driven viewing.
//!
//! Library root: data, playback, interaction, SDK builder, and config modules.

pub mod camera;
pub mod config;
pub mod data;
pub mod gaze;
pub mod playback;
pub mod render;
mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

pub use data::csv::parse_frames;
pub use data::{Frame, FrameSequence, LoadOutcome, LoadStatus, Point};
