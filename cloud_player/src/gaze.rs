//! Gaze dwell detection: continuous intersection samples → discrete selections.
//!
//! A slow repeating timer polls the current camera-ray intersection against
//! the stage grid and feeds it through a small state machine. Holding the
//! same cell escalates visual feedback and eventually fires a recenter;
//! losing or switching the target resets the dwell timer. Targets compare
//! by their quantized `(col, row)` identity, never by raw position, so
//! floating-point jitter in the hit point cannot reset the dwell.

use bevy::prelude::*;

use crate::config::PlayerConfig;
use crate::scene::{GazeRay, ScenePoses, StageCell, StageRoot, STAGE_CELLS};

/// Stable discrete identity of one stage cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub col: i32,
    pub row: i32,
}

/// Dwell state, owned by the detector alone.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub enum GazeState {
    #[default]
    Idle,
    Tracking {
        target: CellId,
        position: Vec3,
        dwell_ticks: u32,
    },
}

/// Outcome of one detector tick, applied by the driving system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GazeEffect {
    /// Nothing under the gaze; any prior highlight is cleared.
    Cleared { previous: Option<CellId> },
    /// A new target was acquired (or the target changed); dwell restarts.
    Acquired {
        target: CellId,
        previous: Option<CellId>,
    },
    /// Same target held; feedback escalates through numbered stages.
    Feedback { target: CellId, stage: usize },
    /// Dwell threshold reached: recenter on the held position and restart
    /// the dwell timer. Tracking continues, so selection is repeatable.
    Select { target: CellId, position: Vec3 },
}

/// One transition of the dwell state machine. `thresholds` are the
/// ascending tick boundaries; the last entry is the select threshold.
pub fn tick(
    state: &mut GazeState,
    hit: Option<(CellId, Vec3)>,
    thresholds: &[u32],
) -> GazeEffect {
    let previous = match *state {
        GazeState::Tracking { target, .. } => Some(target),
        GazeState::Idle => None,
    };

    let Some((target, position)) = hit else {
        *state = GazeState::Idle;
        return GazeEffect::Cleared { previous };
    };

    match state {
        GazeState::Tracking {
            target: held,
            position: held_position,
            dwell_ticks,
        } if *held == target => {
            *dwell_ticks += 1;
            *held_position = position;
            if thresholds.last().is_some_and(|&last| *dwell_ticks >= last) {
                *dwell_ticks = 0;
                GazeEffect::Select { target, position }
            } else {
                let stage = thresholds
                    .iter()
                    .filter(|&&boundary| *dwell_ticks >= boundary)
                    .count()
                    + 1;
                GazeEffect::Feedback { target, stage }
            }
        }
        _ => {
            *state = GazeState::Tracking {
                target,
                position,
                dwell_ticks: 0,
            };
            GazeEffect::Acquired { target, previous }
        }
    }
}

/// Where the camera's forward ray currently meets the stage grid, if
/// anywhere. Replaces push-style contact callbacks with a polled query:
/// the detector samples this once per tick, so intra-tick event bursts
/// cannot double-count dwell. The hit position is reported in stage-local
/// space, the frame the calibration offset is expressed in.
pub fn query_current_intersection(
    camera: &GlobalTransform,
    stage: &GlobalTransform,
) -> Option<(CellId, Vec3)> {
    let (_, rotation, translation) = camera.to_scale_rotation_translation();
    let inverse = stage.affine().inverse();
    let origin = inverse.transform_point3(translation);
    let direction = inverse.transform_vector3(rotation * Vec3::NEG_Z);

    if direction.z.abs() < f32::EPSILON {
        return None;
    }
    let t = -origin.z / direction.z;
    if t <= 0.0 {
        return None;
    }

    let local = origin + direction * t;
    // Cells sit at integer stage-local coordinates, one unit apart.
    let col = (local.x + 0.5).floor() as i32;
    let row = (local.y + 0.5).floor() as i32;
    if !(0..STAGE_CELLS).contains(&col) || !(0..STAGE_CELLS).contains(&row) {
        return None;
    }

    Some((CellId { col, row }, local))
}

/// Repeating tick driving the detector, inserted by the SDK from the
/// configured dwell interval.
#[derive(Resource)]
pub struct GazeTimer(pub Timer);

pub fn gaze_plugin(app: &mut App) {
    app.init_resource::<GazeState>()
        .add_systems(Update, gaze_tick_system);
}

const FEEDBACK_COLORS: [Color; 2] = [
    Color::srgb(0.0, 200.0 / 255.0, 0.0),
    Color::srgb(0.0, 150.0 / 255.0, 0.0),
];

fn feedback_color(stage: usize) -> Color {
    FEEDBACK_COLORS[(stage.saturating_sub(1)).min(FEEDBACK_COLORS.len() - 1)]
}

/// Slow driver: one detector transition per timer tick.
#[allow(clippy::too_many_arguments)]
fn gaze_tick_system(
    time: Res<Time>,
    mut timer: ResMut<GazeTimer>,
    mut state: ResMut<GazeState>,
    config: Res<PlayerConfig>,
    poses: Res<ScenePoses>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cameras: Query<(&GlobalTransform, &mut Transform), With<Camera3d>>,
    stage_root: Query<&GlobalTransform, (With<StageRoot>, Without<Camera3d>)>,
    mut gaze_rays: Query<&mut Transform, (With<GazeRay>, Without<Camera3d>)>,
    cells: Query<(&StageCell, &MeshMaterial3d<StandardMaterial>)>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    let Ok((camera_global, mut camera_transform)) = cameras.get_single_mut() else {
        return;
    };
    let Ok(stage_global) = stage_root.get_single() else {
        return;
    };

    let hit = query_current_intersection(camera_global, stage_global);
    let effect = tick(&mut state, hit, &config.dwell_tick_thresholds);

    let mut paint = |id: CellId, color: Color| {
        for (cell, material) in &cells {
            if cell.id == id {
                if let Some(material) = materials.get_mut(&material.0) {
                    material.base_color = color;
                }
            }
        }
    };

    match effect {
        GazeEffect::Cleared { previous } => {
            if let Some(previous) = previous {
                paint(previous, Color::WHITE);
            }
        }
        GazeEffect::Acquired { target, previous } => {
            if let Some(previous) = previous {
                paint(previous, Color::WHITE);
            }
            paint(target, Color::WHITE);
        }
        GazeEffect::Feedback { target, stage } => {
            paint(target, feedback_color(stage));
        }
        GazeEffect::Select { target, position } => {
            paint(target, Color::WHITE);
            recenter(
                position,
                config.calibration_offset,
                &poses,
                &mut camera_transform,
                &mut gaze_rays,
            );
        }
    }
}

/// Shift the camera and gaze ray so the selected stage position sits
/// centered under the current view. Only x and y move; depth stays put.
fn recenter(
    position: Vec3,
    offset: Vec3,
    poses: &ScenePoses,
    camera: &mut Transform,
    gaze_rays: &mut Query<&mut Transform, (With<GazeRay>, Without<Camera3d>)>,
) {
    let (x, y) = recentered_xy(position, offset, poses.camera);
    camera.translation.x = x;
    camera.translation.y = y;

    for mut ray in gaze_rays.iter_mut() {
        let (x, y) = recentered_xy(position, offset, poses.gaze_ray);
        ray.translation.x = x;
        ray.translation.y = y;
    }
}

/// Stage-local selection plus calibration offset, relative to a default pose.
fn recentered_xy(position: Vec3, offset: Vec3, default_pose: Vec3) -> (f32, f32) {
    (
        position.x + offset.x + default_pose.x,
        position.y + offset.y + default_pose.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: [u32; 2] = [2, 4];

    fn cell(col: i32, row: i32) -> CellId {
        CellId { col, row }
    }

    fn hit(id: CellId) -> Option<(CellId, Vec3)> {
        Some((id, Vec3::new(id.col as f32, id.row as f32, 0.0)))
    }

    #[test]
    fn five_held_ticks_fire_exactly_one_select_on_the_fourth() {
        let mut state = GazeState::default();
        let target = cell(3, 7);

        assert_eq!(
            tick(&mut state, hit(target), &THRESHOLDS),
            GazeEffect::Acquired {
                target,
                previous: None
            }
        );

        let mut selects = 0;
        let mut effects = Vec::new();
        for _ in 0..5 {
            let effect = tick(&mut state, hit(target), &THRESHOLDS);
            if matches!(effect, GazeEffect::Select { .. }) {
                selects += 1;
            }
            effects.push(effect);
        }

        assert_eq!(selects, 1);
        assert_eq!(
            effects[0],
            GazeEffect::Feedback { target, stage: 1 }
        );
        assert_eq!(
            effects[1],
            GazeEffect::Feedback { target, stage: 2 }
        );
        assert_eq!(
            effects[2],
            GazeEffect::Feedback { target, stage: 2 }
        );
        assert!(matches!(effects[3], GazeEffect::Select { .. }));
        // Tracking continues: the fifth tick is dwell 1 again.
        assert_eq!(
            effects[4],
            GazeEffect::Feedback { target, stage: 1 }
        );
    }

    #[test]
    fn switching_targets_resets_the_dwell() {
        let mut state = GazeState::default();
        let first = cell(0, 0);
        let second = cell(1, 0);

        tick(&mut state, hit(first), &THRESHOLDS);
        tick(&mut state, hit(first), &THRESHOLDS);
        tick(&mut state, hit(first), &THRESHOLDS);

        assert_eq!(
            tick(&mut state, hit(second), &THRESHOLDS),
            GazeEffect::Acquired {
                target: second,
                previous: Some(first)
            }
        );
        assert_eq!(
            state,
            GazeState::Tracking {
                target: second,
                position: Vec3::new(1.0, 0.0, 0.0),
                dwell_ticks: 0
            }
        );
    }

    #[test]
    fn losing_the_target_clears_to_idle() {
        let mut state = GazeState::default();
        let target = cell(5, 5);

        tick(&mut state, hit(target), &THRESHOLDS);
        assert_eq!(
            tick(&mut state, None, &THRESHOLDS),
            GazeEffect::Cleared {
                previous: Some(target)
            }
        );
        assert_eq!(state, GazeState::Idle);
    }

    #[test]
    fn jittered_position_with_same_identity_keeps_dwelling() {
        let mut state = GazeState::default();
        let target = cell(2, 2);

        tick(&mut state, Some((target, Vec3::new(2.0, 2.0, 0.0))), &THRESHOLDS);
        let effect = tick(
            &mut state,
            Some((target, Vec3::new(2.0001, 1.9999, 0.0))),
            &THRESHOLDS,
        );

        assert_eq!(effect, GazeEffect::Feedback { target, stage: 1 });
    }

    #[test]
    fn forward_ray_quantizes_to_the_cell_under_the_gaze() {
        let camera = GlobalTransform::from(Transform::from_xyz(5.6, 10.0, 3.0));
        let stage = GlobalTransform::IDENTITY;

        let (id, position) =
            query_current_intersection(&camera, &stage).expect("ray should hit the stage");

        assert_eq!(id, CellId { col: 6, row: 10 });
        assert!((position.x - 5.6).abs() < 1e-5);
        assert!((position.y - 10.0).abs() < 1e-5);
        assert!(position.z.abs() < 1e-5);
    }

    #[test]
    fn hit_position_is_reported_in_stage_space() {
        // Stage translated the way the scene anchors it under the world
        // root; the reported position must not absorb that translation.
        let camera = GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 3.0));
        let stage = GlobalTransform::from(Transform::from_xyz(-9.0, -9.0, -1.0));

        let (id, position) =
            query_current_intersection(&camera, &stage).expect("ray should hit the stage");

        assert_eq!(id, CellId { col: 9, row: 9 });
        assert!((position - Vec3::new(9.0, 9.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn selecting_the_center_cell_recenters_onto_the_default_pose() {
        // Cell (9,9) plus the (-9, -5.5) calibration lands the camera back
        // on its default x.
        let (x, y) = recentered_xy(
            Vec3::new(9.0, 9.0, 0.0),
            Vec3::new(-9.0, -5.5, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        );

        assert_eq!(x, 0.0);
        assert_eq!(y, 3.5);
    }

    #[test]
    fn ray_missing_the_grid_reports_no_target() {
        // Looking away from the plane.
        let camera = GlobalTransform::from(
            Transform::from_xyz(0.0, 0.0, -1.0).looking_at(Vec3::new(0.0, 0.0, -10.0), Vec3::Y),
        );
        let stage = GlobalTransform::IDENTITY;

        assert_eq!(query_current_intersection(&camera, &stage), None);

        // Hitting the plane outside the 18x18 grid.
        let camera = GlobalTransform::from(Transform::from_xyz(40.0, 0.0, 3.0));
        assert_eq!(query_current_intersection(&camera, &stage), None);
    }
}
