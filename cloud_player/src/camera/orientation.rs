//! Device-attitude camera: roll/pitch/yaw samples mapped onto the view.

use std::time::Duration;

use bevy::prelude::*;
use crossbeam_channel::Receiver;

use crate::scene::GazeRay;

/// One raw attitude reading from the sensor backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttitudeSample {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Fixed axis remap from device attitude to camera euler angles.
/// Applied unconditionally: no smoothing, no dead-zone, no unwrapping.
pub fn attitude_to_euler(sample: AttitudeSample) -> Vec3 {
    Vec3::new(-sample.roll, sample.pitch, sample.yaw)
}

/// Interface for sensor backends that stream attitude samples onto a
/// channel from their own thread.
pub trait AttitudeSource: Send + 'static {
    fn spawn(sample_interval: Duration) -> Receiver<AttitudeSample>;
}

/// Bevy resource holding the channel from the sensor thread. Samples are
/// marshaled onto the ECS thread here before any transform is touched.
#[derive(Resource)]
pub struct AttitudeChannel(pub Receiver<AttitudeSample>);

/// Backend for hosts without motion hardware: never sends, so the camera
/// keeps its last orientation indefinitely.
pub struct NullAttitudeSource;

impl AttitudeSource for NullAttitudeSource {
    fn spawn(_sample_interval: Duration) -> Receiver<AttitudeSample> {
        let (_tx, rx) = crossbeam_channel::bounded(0);
        rx
    }
}

pub fn attitude_camera_plugin(app: &mut App) {
    app.add_systems(Update, apply_attitude_system);
}

/// Applies the latest queued sample to the camera; the gaze ray copies the
/// same orientation verbatim. Intermediate samples within one frame are
/// superseded, never averaged.
fn apply_attitude_system(
    channel: Res<AttitudeChannel>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
    mut gaze_rays: Query<&mut Transform, (With<GazeRay>, Without<Camera3d>)>,
) {
    let Some(sample) = channel.0.try_iter().last() else {
        return;
    };

    let euler = attitude_to_euler(sample);
    let rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);

    for mut transform in &mut cameras {
        transform.rotation = rotation;
    }
    for mut transform in &mut gaze_rays {
        transform.rotation = rotation;
    }
}
