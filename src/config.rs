//! Simulation configuration (TOML)
//!
//! Bundles the car tuning, the track layout and the clock limits a host
//! needs to stand up a session. Every section and field has a default, so
//! an empty document is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::physics::clamp_dt;
use crate::sim::{Float3, MAX_DT};
use crate::track::{Canyon, TrackError, TrackSurface, WidthProfile};
use crate::vehicle::{CarConfig, CarSpec};

/// Largest `max_dt` a configuration may ask for (s).
pub const MAX_DT_LIMIT: f32 = 0.25;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid track: {0}")]
    Track(#[from] TrackError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub car: CarSpec,
    #[serde(default)]
    pub track: TrackSettings,
    #[serde(default)]
    pub clock: ClockSettings,
}

/// Track layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    /// Curve control points as `[x, y, z]` (default: a short descending road)
    #[serde(default = "default_control_points")]
    pub control_points: Vec<[f32; 3]>,
    /// Nominal lane width in meters (default: 24)
    #[serde(default = "default_width")]
    pub width: f32,
    /// Tessellation segments (default: 600)
    #[serde(default = "default_segments")]
    pub segments: usize,
    /// Whether the curve loops back to its first point (default: false)
    #[serde(default)]
    pub closed: bool,
    /// Optional narrowing along part of the track
    #[serde(default)]
    pub canyon: Option<Canyon>,
}

/// Frame clock limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSettings {
    /// Largest step handed to the integrator (default: 0.05)
    #[serde(default = "default_max_dt")]
    pub max_dt: f32,
}

fn default_control_points() -> Vec<[f32; 3]> {
    vec![
        [0.0, 40.0, 0.0],
        [30.0, 36.0, 120.0],
        [-20.0, 30.0, 240.0],
        [10.0, 22.0, 360.0],
        [0.0, 15.0, 480.0],
    ]
}
fn default_width() -> f32 {
    24.0
}
fn default_segments() -> usize {
    600
}
fn default_max_dt() -> f32 {
    MAX_DT
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            control_points: default_control_points(),
            width: default_width(),
            segments: default_segments(),
            closed: false,
            canyon: None,
        }
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            max_dt: default_max_dt(),
        }
    }
}

impl ClockSettings {
    /// Bounds a raw frame delta for the integrator.
    pub fn clamp(&self, raw_dt: f32) -> f32 {
        clamp_dt(raw_dt, self.max_dt)
    }
}

impl TrackSettings {
    pub fn points(&self) -> Vec<Float3> {
        self.control_points
            .iter()
            .map(|&[x, y, z]| Float3::new(x, y, z))
            .collect()
    }

    pub fn build(&self) -> Result<TrackSurface, TrackError> {
        let profile = self.canyon.as_ref().map(|c| c as &dyn WidthProfile);
        TrackSurface::from_control_points(
            self.points(),
            self.closed,
            self.width,
            self.segments,
            profile,
        )
    }
}

impl SimConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("loaded sim config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_dt = self.clock.max_dt;
        if !(max_dt > 0.0 && max_dt <= MAX_DT_LIMIT) {
            return Err(ConfigError::Invalid(format!(
                "clock.max_dt must be in (0, {MAX_DT_LIMIT}], got {max_dt}"
            )));
        }
        let width = self.track.width;
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "track.width must be positive, got {width}"
            )));
        }
        Ok(())
    }

    pub fn car_config(&self) -> CarConfig {
        CarConfig::from_spec(self.car)
    }

    pub fn build_track(&self) -> Result<TrackSurface, ConfigError> {
        Ok(self.track.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-5;

    #[test]
    fn empty_document_is_default() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.car, CarSpec::default());
        assert_relative_eq!(config.clock.max_dt, MAX_DT, epsilon = TOLERANCE);
    }

    #[test]
    fn parses_full_document() {
        let config = SimConfig::from_toml_str(
            r#"
            [car]
            drift_control = 5
            power = 1

            [track]
            control_points = [[0, 0, 0], [0, -10, 100], [20, -20, 200]]
            width = 18.0
            segments = 120

            [track.canyon]
            start = 0.4
            end = 0.6
            narrowest = 0.5

            [clock]
            max_dt = 0.02
            "#,
        )
        .unwrap();

        assert_eq!(config.car, CarSpec::new(5, 1));
        assert_eq!(config.track.control_points.len(), 3);
        assert_eq!(config.track.segments, 120);
        assert!(!config.track.closed);
        assert_eq!(config.track.canyon, Some(Canyon::new(0.4, 0.6, 0.5)));

        let track = config.build_track().unwrap();
        assert_eq!(track.len(), 121);
        assert_relative_eq!(track.nominal_width(), 18.0, epsilon = TOLERANCE);
        let middle = track.sample_at_distance(track.total_length() * 0.5);
        assert!(middle.width < 18.0);
    }

    #[test]
    fn default_track_builds() {
        let track = SimConfig::default().build_track().unwrap();
        assert_eq!(track.segment_count(), 600);
        assert!(track.total_length() > 400.0);
    }

    #[test]
    fn rejects_bad_clock() {
        let err = SimConfig::from_toml_str("[clock]\nmax_dt = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SimConfig::from_toml_str("[clock]\nmax_dt = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_width() {
        let err = SimConfig::from_toml_str("[track]\nwidth = -3.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SimConfig::from_toml_str("[car\npower = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn track_errors_surface_through_build() {
        let config = SimConfig::from_toml_str("[track]\ncontrol_points = [[0, 0, 0]]").unwrap();
        let err = config.build_track().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Track(TrackError::TooFewControlPoints { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SimConfig::load("/nonexistent/driftengine/sim.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn clock_clamps_frame_delta() {
        let clock = ClockSettings::default();
        assert_relative_eq!(clock.clamp(0.2), MAX_DT, epsilon = TOLERANCE);
        assert_relative_eq!(clock.clamp(-1.0), 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(clock.clamp(f32::NAN), 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(clock.clamp(0.016), 0.016, epsilon = TOLERANCE);
    }

    #[test]
    fn round_trips_through_toml_text() {
        let config = SimConfig {
            car: CarSpec::new(4, 3),
            ..SimConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
    }
}
