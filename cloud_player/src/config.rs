//! Env parsing, defaults, and engine constants.

use std::path::PathBuf;

use bevy::prelude::*;

const DEFAULT_DATA_PATH: &str = "assets/depth_video_data.csv";

pub const DEFAULT_RESOLUTION_RATIO: i64 = 2;
pub const DEFAULT_TRIM_LIMIT: f32 = 400.0;
pub const DEFAULT_FRAME_RATE: f32 = 30.0;
pub const DEFAULT_DWELL_TICK_INTERVAL: f32 = 0.5;
pub const DEFAULT_SENSOR_SAMPLE_INTERVAL: f32 = 1.0;

/// Tile footprint per unit of resolution ratio. Tiles grow with decimation
/// so the sparser grid still covers the surface.
pub const SURFACE_BASE_UNIT: f32 = 0.05;

/// Knobs consumed by the CSV decoder.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Decimation factor: keep a record iff `(col/4) % ratio == 0` and
    /// `(row/4) % ratio == 0`.
    pub resolution_ratio: i64,
    /// Records with `|x| > trim_limit` or `|y| > trim_limit` (source units,
    /// pre-scaling) are dropped.
    pub trim_limit: f32,
    /// Stop the load when this step is reached; only prior steps are kept.
    pub debug_max_step: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            resolution_ratio: DEFAULT_RESOLUTION_RATIO,
            trim_limit: DEFAULT_TRIM_LIMIT,
            debug_max_step: None,
        }
    }
}

/// Full player configuration; inserted as a resource by the SDK builder.
#[derive(Resource, Clone, Debug)]
pub struct PlayerConfig {
    pub loader: LoaderConfig,
    /// Capture rate of the recording; elapsed seconds map to steps via this.
    pub frame_rate: f32,
    /// Dwell-tick boundaries for feedback escalation; the last entry is the
    /// select threshold.
    pub dwell_tick_thresholds: Vec<u32>,
    /// Seconds between gaze-detector ticks.
    pub dwell_tick_interval: f32,
    /// Seconds between attitude samples requested from the sensor backend.
    pub sensor_sample_interval: f32,
    /// Applied to the selected position when recentering the view.
    pub calibration_offset: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            dwell_tick_thresholds: vec![2, 4],
            dwell_tick_interval: DEFAULT_DWELL_TICK_INTERVAL,
            sensor_sample_interval: DEFAULT_SENSOR_SAMPLE_INTERVAL,
            calibration_offset: Vec3::new(-9.0, -5.5, 0.0),
        }
    }
}

impl PlayerConfig {
    /// Defaults with loader knobs overridden from the environment.
    pub fn from_env() -> Self {
        Self {
            loader: loader_config(),
            ..Self::default()
        }
    }

    /// Visual footprint of one quad tile: base unit scaled by decimation.
    pub fn surface_size(&self) -> f32 {
        SURFACE_BASE_UNIT * self.loader.resolution_ratio as f32
    }
}

/// Path to the recorded CSV, from `CLOUD_CSV` or the bundled default.
pub fn data_path() -> PathBuf {
    std::env::var("CLOUD_CSV")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

/// Optional JSON fixture path from `CLOUD_FIXTURE`; replaces the CSV load.
pub fn fixture_path() -> Option<PathBuf> {
    std::env::var("CLOUD_FIXTURE").ok().map(PathBuf::from)
}

/// Loader knobs from `RESOLUTION_RATIO`, `TRIM_LIMIT`, and `DEBUG_MAX_STEP`.
/// Invalid values log and fall back to the defaults.
pub fn loader_config() -> LoaderConfig {
    let mut config = LoaderConfig::default();

    if let Ok(raw) = std::env::var("RESOLUTION_RATIO") {
        match raw.parse::<i64>() {
            Ok(ratio) if ratio >= 1 => config.resolution_ratio = ratio,
            _ => eprintln!("voluma: invalid RESOLUTION_RATIO: {raw:?}"),
        }
    }
    if let Ok(raw) = std::env::var("TRIM_LIMIT") {
        match raw.parse::<f32>() {
            Ok(limit) if limit > 0.0 => config.trim_limit = limit,
            _ => eprintln!("voluma: invalid TRIM_LIMIT: {raw:?}"),
        }
    }
    if let Ok(raw) = std::env::var("DEBUG_MAX_STEP") {
        match raw.parse::<usize>() {
            Ok(step) => config.debug_max_step = Some(step),
            Err(_) => eprintln!("voluma: invalid DEBUG_MAX_STEP: {raw:?}"),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    struct EnvGuard {
        snapshot: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn capture(keys: &[&'static str]) -> Self {
            let snapshot = keys
                .iter()
                .map(|&key| (key, std::env::var(key).ok()))
                .collect();
            for key in keys {
                std::env::remove_var(key);
            }
            Self { snapshot }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.snapshot {
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    const ENV_KEYS: [&str; 5] = [
        "CLOUD_CSV",
        "CLOUD_FIXTURE",
        "RESOLUTION_RATIO",
        "TRIM_LIMIT",
        "DEBUG_MAX_STEP",
    ];

    #[test]
    fn loader_config_defaults_without_env() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        let config = loader_config();

        assert_eq!(config.resolution_ratio, DEFAULT_RESOLUTION_RATIO);
        assert_eq!(config.trim_limit, DEFAULT_TRIM_LIMIT);
        assert_eq!(config.debug_max_step, None);
    }

    #[test]
    fn loader_config_reads_overrides() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("RESOLUTION_RATIO", "3");
        std::env::set_var("TRIM_LIMIT", "250.5");
        std::env::set_var("DEBUG_MAX_STEP", "50");

        let config = loader_config();

        assert_eq!(config.resolution_ratio, 3);
        assert_eq!(config.trim_limit, 250.5);
        assert_eq!(config.debug_max_step, Some(50));
    }

    #[test]
    fn invalid_overrides_fall_back_to_defaults() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("RESOLUTION_RATIO", "0");
        std::env::set_var("TRIM_LIMIT", "not-a-number");

        let config = loader_config();

        assert_eq!(config.resolution_ratio, DEFAULT_RESOLUTION_RATIO);
        assert_eq!(config.trim_limit, DEFAULT_TRIM_LIMIT);
    }

    #[test]
    fn data_path_uses_env_override() {
        let _lock = lock_env();
        let _guard = EnvGuard::capture(&ENV_KEYS);

        std::env::set_var("CLOUD_CSV", "/tmp/capture.csv");

        assert_eq!(data_path(), PathBuf::from("/tmp/capture.csv"));
    }

    #[test]
    fn surface_size_scales_with_resolution_ratio() {
        let mut config = PlayerConfig::default();
        config.loader.resolution_ratio = 4;

        assert!((config.surface_size() - 0.2).abs() < f32::EPSILON);
    }
}
