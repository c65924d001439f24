use serde::{Deserialize, Serialize};

use super::config::CarConfig;
use super::drift::DriftState;
use crate::sim::physics::clamp_finite;
use crate::sim::{Float2, Float3};
use crate::track::{ProjectionResult, TrackSurface};

/// Driver controls for one tick.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// -1 (full left) to 1 (full right).
    pub steer: f32,
    pub throttle: f32,
    pub brake: f32,
    pub handbrake: f32,
}

impl InputSnapshot {
    pub fn new(steer: f32, throttle: f32, brake: f32, handbrake: f32) -> Self {
        Self {
            steer,
            throttle,
            brake,
            handbrake,
        }
    }

    /// Copy with every control in range; NaN reads as released.
    pub fn clamped(&self) -> Self {
        Self {
            steer: clamp_finite(self.steer, -1.0, 1.0),
            throttle: clamp_finite(self.throttle, 0.0, 1.0),
            brake: clamp_finite(self.brake, 0.0, 1.0),
            handbrake: clamp_finite(self.handbrake, 0.0, 1.0),
        }
    }
}

/// Per-tick readout handed to HUD and scoring consumers.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// m/s
    pub speed: f32,
    pub slip_angle_deg: f32,
    pub drift_active: bool,
    pub score: f32,
    pub grade_percent: f32,
    /// Arc distance along the track (m).
    pub progress: f32,
    /// Signed distance right of the centerline (m).
    pub lateral_offset: f32,
}

/// Car forward on the ground plane for a yaw angle (x, z).
pub fn forward_from_yaw(yaw: f32) -> Float2 {
    let (sin, cos) = yaw.sin_cos();
    Float2::new(-sin, cos)
}

/// Car right on the ground plane for a yaw angle (x, z).
pub fn right_from_yaw(yaw: f32) -> Float2 {
    let (sin, cos) = yaw.sin_cos();
    Float2::new(-cos, -sin)
}

/// Mutable state of one car, owned by the caller and advanced by
/// [`super::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct CarState {
    pub position: Float3,
    /// Planar world velocity (x, z).
    pub velocity: Float2,
    /// Heading in (-PI, PI]; 0 faces +Z, positive turns right.
    pub yaw: f32,
    pub yaw_rate: f32,
    pub steer_angle: f32,
    pub drift: DriftState,
    /// Body slip angle (rad), positive when sliding right.
    pub slip_angle: f32,
    pub grade_percent: f32,
    pub progress: f32,
    pub lateral_offset: f32,
    /// Projection from the latest tick; `None` until the first step.
    pub last_projection: Option<ProjectionResult>,
}

impl Default for CarState {
    fn default() -> Self {
        Self {
            position: Float3::ZERO,
            velocity: Float2::ZERO,
            yaw: 0.0,
            yaw_rate: 0.0,
            steer_angle: 0.0,
            drift: DriftState::default(),
            slip_angle: 0.0,
            grade_percent: 0.0,
            progress: 0.0,
            lateral_offset: 0.0,
            last_projection: None,
        }
    }
}

impl CarState {
    /// Car at rest on the surface, `distance` along the track and `lateral`
    /// meters right of center, facing down the track.
    pub fn spawn(track: &TrackSurface, distance: f32, lateral: f32, config: &CarConfig) -> Self {
        let sample = track.sample_at_distance(distance);
        let half = (sample.width * 0.5 - super::LANE_MARGIN).max(0.0);
        let lateral = clamp_finite(lateral, -half, half);

        Self {
            position: sample.offset_position(lateral, config.ride_height),
            yaw: sample.frame().heading(),
            grade_percent: sample.frame().grade_percent(),
            progress: sample.distance,
            lateral_offset: lateral,
            ..Self::default()
        }
    }

    /// Sets the velocity to `speed` along the current heading.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.velocity = forward_from_yaw(self.yaw) * speed;
        self
    }

    pub fn forward(&self) -> Float2 {
        forward_from_yaw(self.yaw)
    }

    pub fn right(&self) -> Float2 {
        right_from_yaw(self.yaw)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Velocity in the car frame: (longitudinal, lateral).
    pub fn local_velocity(&self) -> (f32, f32) {
        (
            self.velocity.dot(self.forward()),
            self.velocity.dot(self.right()),
        )
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            speed: self.speed(),
            slip_angle_deg: self.slip_angle.to_degrees(),
            drift_active: self.drift.active,
            score: self.drift.score,
            grade_percent: self.grade_percent,
            progress: self.progress,
            lateral_offset: self.lateral_offset,
        }
    }
}
