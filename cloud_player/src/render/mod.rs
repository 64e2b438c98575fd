//! Renderer traits and default implementations.

mod quad_tiles;

use bevy::prelude::*;

use crate::data::Frame;

pub use quad_tiles::{
    build_mesh, mesh_from_description, MeshDescription, QuadTileSettings, QuadTilesRenderer,
};

/// Turns one frame into renderable scene content under the video root.
/// Implementations must be deterministic per frame; the playback driver
/// guarantees at most one call per distinct step.
pub trait FrameRenderer: Send + Sync + 'static {
    fn setup(&self, _app: &mut App) {}
    fn spawn_frame(
        &self,
        commands: &mut Commands,
        meshes: &mut ResMut<Assets<Mesh>>,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        video_root: Entity,
        frame: &Frame,
        fallback: &Frame,
    );
}

#[derive(Resource)]
pub struct RendererResource(pub Box<dyn FrameRenderer>);

impl RendererResource {
    pub fn new(renderer: impl FrameRenderer) -> Self {
        Self(Box::new(renderer))
    }
}
