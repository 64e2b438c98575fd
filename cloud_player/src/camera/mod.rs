mod orientation;

pub use orientation::{
    attitude_camera_plugin, attitude_to_euler, AttitudeChannel, AttitudeSample, AttitudeSource,
    NullAttitudeSource,
};
