//! Selectable stage: an 18×18 grid of flat cells behind the video volume,
//! plus the gaze-ray indicator.

use bevy::prelude::*;

use crate::gaze::CellId;
use crate::scene::GAZE_RAY_DEFAULT_POSITION;

pub const STAGE_CELLS: i32 = 18;

const STAGE_ANCHOR: Vec3 = Vec3::new(-9.0, -9.0, 0.0);
const CELL_SIZE: f32 = 0.99;
const CELL_DEPTH: f32 = 1e-5;

const GAZE_RAY_THICKNESS: f32 = 0.005;
const GAZE_RAY_LENGTH: f32 = 20.0;

/// Anchor of the cell grid; the gaze query works in this entity's space.
#[derive(Component)]
pub struct StageRoot;

/// One selectable cell, carrying its stable grid identity.
#[derive(Component)]
pub struct StageCell {
    pub id: CellId,
}

/// The visual gaze indicator; copies the camera orientation verbatim.
#[derive(Component)]
pub struct GazeRay;

pub fn spawn_stage(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world_root: Entity,
) {
    let cell_mesh = meshes.add(Cuboid::new(CELL_SIZE, CELL_SIZE, CELL_DEPTH));

    let stage = commands
        .spawn((
            Transform::from_translation(STAGE_ANCHOR),
            Visibility::default(),
            StageRoot,
        ))
        .id();
    commands.entity(world_root).add_child(stage);

    commands.entity(stage).with_children(|builder| {
        for row in 0..STAGE_CELLS {
            for col in 0..STAGE_CELLS {
                // Each cell owns its material so dwell feedback tints it alone.
                let material = materials.add(StandardMaterial {
                    base_color: Color::WHITE,
                    ..default()
                });
                builder.spawn((
                    Mesh3d(cell_mesh.clone()),
                    MeshMaterial3d(material),
                    Transform::from_xyz(col as f32, row as f32, 0.0),
                    StageCell {
                        id: CellId { col, row },
                    },
                ));
            }
        }
    });
}

pub fn spawn_gaze_ray(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    world_root: Entity,
) {
    let mesh = meshes.add(Cuboid::new(
        GAZE_RAY_THICKNESS,
        GAZE_RAY_THICKNESS,
        GAZE_RAY_LENGTH,
    ));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(55.0 / 255.0, 1.0, 50.0 / 255.0, 0.8),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let ray = commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(GAZE_RAY_DEFAULT_POSITION),
            GazeRay,
        ))
        .id();
    commands.entity(world_root).add_child(ray);
}
