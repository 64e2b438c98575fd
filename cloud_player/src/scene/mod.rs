pub(crate) mod stage;
mod video;

use bevy::prelude::*;

pub use stage::{spawn_gaze_ray, spawn_stage, GazeRay, StageCell, StageRoot, STAGE_CELLS};
pub use video::{ingest_frames, VideoRoot, VideoSequence, VideoTile};

/// Default poses recorded at setup; the recenter action is expressed
/// relative to these.
#[derive(Resource)]
pub struct ScenePoses {
    pub camera: Vec3,
    pub gaze_ray: Vec3,
}

// Placement tuned for the recorded video data.
pub const CAMERA_DEFAULT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const GAZE_RAY_DEFAULT_POSITION: Vec3 = Vec3::new(-0.03, -3.5, 3.3);
const WORLD_POSITION: Vec3 = Vec3::new(2.4, 5.0, -1.0);
const VIDEO_TILT_X: f32 = 2.2;
const LIGHT_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(VideoSequence::default());
    commands.insert_resource(ScenePoses {
        camera: CAMERA_DEFAULT_POSITION,
        gaze_ray: GAZE_RAY_DEFAULT_POSITION,
    });

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(CAMERA_DEFAULT_POSITION),
    ));

    let world = commands
        .spawn((
            Transform::from_translation(WORLD_POSITION),
            Visibility::default(),
        ))
        .id();

    let video = commands
        .spawn((
            Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, VIDEO_TILT_X, 0.0, 0.0)),
            Visibility::default(),
            VideoRoot,
        ))
        .id();
    commands.entity(world).add_child(video);

    spawn_stage(&mut commands, &mut meshes, &mut materials, world);
    spawn_gaze_ray(&mut commands, &mut meshes, &mut materials, world);

    let light = commands
        .spawn((
            PointLight::default(),
            Transform::from_translation(LIGHT_POSITION),
        ))
        .id();
    commands.entity(world).add_child(light);
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.33, 0.33, 0.33),
        brightness: 80.0,
    });
}
