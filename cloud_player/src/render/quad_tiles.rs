use bevy::prelude::*;
use bevy::render::{
    mesh::Indices, render_asset::RenderAssetUsages, render_resource::PrimitiveTopology,
};

use crate::data::Frame;
use crate::render::FrameRenderer;
use crate::scene::VideoTile;

use crate::config::{DEFAULT_RESOLUTION_RATIO, SURFACE_BASE_UNIT};

#[derive(Clone, Debug)]
pub struct QuadTileSettings {
    /// Edge length of each tile. Fixed visual footprint independent of true
    /// depth spacing: points render as overlapping flat tiles, not voxels.
    pub surface_size: f32,
}

impl Default for QuadTileSettings {
    fn default() -> Self {
        Self {
            surface_size: SURFACE_BASE_UNIT * DEFAULT_RESOLUTION_RATIO as f32,
        }
    }
}

/// Renderer-agnostic mesh for one frame: 4 vertices and 2 triangles per
/// point, one color per quad. Replaced wholesale on each rebuild.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshDescription {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

/// Synthesize the quad-tile mesh for a frame. An empty frame substitutes
/// `fallback` so playback never hands the renderer a degenerate mesh.
/// Deterministic: identical inputs produce identical output.
pub fn build_mesh(frame: &Frame, fallback: &Frame, surface_size: f32) -> MeshDescription {
    let source = if frame.points.is_empty() {
        fallback
    } else {
        frame
    };

    let mut description = MeshDescription {
        vertices: Vec::with_capacity(source.points.len() * 4),
        triangles: Vec::with_capacity(source.points.len() * 2),
        colors: Vec::with_capacity(source.points.len()),
    };

    let s = surface_size;
    for (index, point) in source.points.iter().enumerate() {
        let [x, y, z] = point.position;
        description.vertices.push([x, y, z]); // left top
        description.vertices.push([x + s, y, z]); // right top
        description.vertices.push([x, y + s, z]); // left bottom
        description.vertices.push([x + s, y + s, z]); // right bottom

        let base = (index * 4) as u32;
        description.triangles.push([base + 1, base + 2, base]);
        description.triangles.push([base + 3, base + 2, base + 1]);

        description.colors.push(point.color);
    }

    description
}

/// Convert to a Bevy mesh. The per-quad color is duplicated across the
/// quad's four vertices; a single mesh cannot bind per-primitive materials.
pub fn mesh_from_description(description: &MeshDescription) -> Mesh {
    let positions = description.vertices.clone();
    let colors: Vec<[f32; 4]> = description
        .colors
        .iter()
        .flat_map(|&[r, g, b]| std::iter::repeat([r, g, b, 1.0]).take(4))
        .collect();
    let indices: Vec<u32> = description
        .triangles
        .iter()
        .flat_map(|tri| tri.iter().copied())
        .collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

#[derive(Default)]
pub struct QuadTilesRenderer {
    pub settings: QuadTileSettings,
}

impl QuadTilesRenderer {
    pub fn new(surface_size: f32) -> Self {
        Self {
            settings: QuadTileSettings { surface_size },
        }
    }
}

impl FrameRenderer for QuadTilesRenderer {
    fn spawn_frame(
        &self,
        commands: &mut Commands,
        meshes: &mut ResMut<Assets<Mesh>>,
        materials: &mut ResMut<Assets<StandardMaterial>>,
        video_root: Entity,
        frame: &Frame,
        fallback: &Frame,
    ) {
        let description = build_mesh(frame, fallback, self.settings.surface_size);
        if description.vertices.is_empty() {
            return;
        }

        let mesh = meshes.add(mesh_from_description(&description));
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            cull_mode: None,
            ..default()
        });

        commands.entity(video_root).with_children(|builder| {
            builder.spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::default(),
                VideoTile,
            ));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point;

    fn frame_with(points: Vec<Point>) -> Frame {
        Frame { step: 0, points }
    }

    fn sample_point(x: f32) -> Point {
        Point {
            position: [x, 2.0, 3.0],
            color: [0.5, 0.25, 0.125],
        }
    }

    #[test]
    fn quad_corners_follow_the_fixed_order() {
        let frame = frame_with(vec![sample_point(1.0)]);
        let description = build_mesh(&frame, &frame, 0.1);

        assert_eq!(
            description.vertices,
            vec![
                [1.0, 2.0, 3.0],
                [1.1, 2.0, 3.0],
                [1.0, 2.1, 3.0],
                [1.1, 2.1, 3.0],
            ]
        );
    }

    #[test]
    fn triangle_indices_interleave_per_point() {
        let frame = frame_with(vec![sample_point(0.0), sample_point(1.0)]);
        let description = build_mesh(&frame, &frame, 0.1);

        assert_eq!(
            description.triangles,
            vec![[1, 2, 0], [3, 2, 1], [5, 6, 4], [7, 6, 5]]
        );
    }

    #[test]
    fn one_color_per_quad() {
        let frame = frame_with(vec![sample_point(0.0), sample_point(1.0)]);
        let description = build_mesh(&frame, &frame, 0.1);

        assert_eq!(description.colors.len(), 2);
        assert_eq!(description.colors[0], [0.5, 0.25, 0.125]);
    }

    #[test]
    fn identical_inputs_build_identical_meshes() {
        let frame = frame_with(vec![sample_point(0.0), sample_point(4.0)]);
        let fallback = frame_with(vec![sample_point(9.0)]);

        let first = build_mesh(&frame, &fallback, 0.05);
        let second = build_mesh(&frame, &fallback, 0.05);

        assert_eq!(first, second);
    }

    #[test]
    fn empty_frame_substitutes_the_fallback() {
        let empty = frame_with(Vec::new());
        let fallback = frame_with(vec![sample_point(7.0)]);

        let from_empty = build_mesh(&empty, &fallback, 0.1);
        let from_fallback = build_mesh(&fallback, &fallback, 0.1);

        assert_eq!(from_empty, from_fallback);
    }

    #[test]
    fn empty_frame_and_fallback_yield_empty_mesh() {
        let empty = frame_with(Vec::new());
        let description = build_mesh(&empty, &empty, 0.1);

        assert!(description.vertices.is_empty());
        assert!(description.triangles.is_empty());
    }
}
