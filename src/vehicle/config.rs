use serde::{Deserialize, Serialize};

use crate::sim::physics::{lerp, G};

pub const DRIFT_CONTROL_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;
pub const POWER_LEVELS: std::ops::RangeInclusive<u8> = 1..=3;

/// The small tunable description a car is derived from.
///
/// Higher `drift_control` loosens the rear axle and makes the handbrake
/// bite harder; higher `power` raises engine force and top speed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSpec {
    /// Drift tuning level, 1-5 (default: 3)
    #[serde(default = "default_drift_control")]
    pub drift_control: u8,
    /// Engine level, 1-3 (default: 2)
    #[serde(default = "default_power")]
    pub power: u8,
}

fn default_drift_control() -> u8 {
    3
}
fn default_power() -> u8 {
    2
}

impl Default for CarSpec {
    fn default() -> Self {
        Self {
            drift_control: default_drift_control(),
            power: default_power(),
        }
    }
}

impl CarSpec {
    pub fn new(drift_control: u8, power: u8) -> Self {
        Self {
            drift_control,
            power,
        }
    }

    /// Copy with both levels pulled into their valid ranges.
    pub fn clamped(self) -> Self {
        let drift_control = self
            .drift_control
            .clamp(*DRIFT_CONTROL_LEVELS.start(), *DRIFT_CONTROL_LEVELS.end());
        let power = self
            .power
            .clamp(*POWER_LEVELS.start(), *POWER_LEVELS.end());
        if drift_control != self.drift_control || power != self.power {
            log::warn!(
                "car spec out of range (drift_control {}, power {}), using ({drift_control}, {power})",
                self.drift_control,
                self.power
            );
        }
        Self {
            drift_control,
            power,
        }
    }
}

/// Physical constants for one car, derived once from a [`CarSpec`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CarConfig {
    /// kg
    pub mass: f32,
    /// kg m^2
    pub yaw_inertia: f32,
    /// Distance from the center of gravity to the front axle (m).
    pub cg_to_front: f32,
    /// Distance from the center of gravity to the rear axle (m).
    pub cg_to_rear: f32,
    /// Peak lateral force of the front axle (N); the tire curve saturates here.
    pub cornering_front: f32,
    /// Peak lateral force of the rear axle (N).
    pub cornering_rear: f32,
    /// Slip angle (rad) that sets the steepness of the tanh tire curve.
    pub peak_slip_angle: f32,
    /// Fraction of lateral grip removed at full handbrake, both axles.
    pub handbrake_grip_loss: f32,
    pub max_engine_force: f32,
    /// Speed (m/s) where engine force reaches zero.
    pub top_speed: f32,
    pub max_brake_force: f32,
    pub handbrake_brake_force: f32,
    /// Quadratic drag, N per (m/s)^2.
    pub drag_coefficient: f32,
    /// Constant rolling resistance (N).
    pub rolling_coefficient: f32,
    /// rad
    pub max_steer_angle: f32,
    /// Steering and yaw response multiplier at standstill.
    pub low_speed_steer: f32,
    /// Speed (m/s) at which steering reaches full authority.
    pub full_steer_speed: f32,
    /// Yaw rate decay per second.
    pub yaw_damping: f32,
    /// Largest fraction of yaw rate removed in one tick.
    pub yaw_damping_cap: f32,
    /// Height of the car's reference point above the surface (m).
    pub ride_height: f32,
}

impl CarConfig {
    pub fn from_spec(spec: CarSpec) -> Self {
        let spec = spec.clamped();
        let drift = f32::from(spec.drift_control);
        let power = f32::from(spec.power);

        let mass = 1200.0;
        let cg_to_front = 1.15;
        let cg_to_rear = 1.45;
        let wheelbase = cg_to_front + cg_to_rear;

        // Static axle loads scaled by a friction factor; the rear loosens
        // as drift control goes up.
        let front_load = mass * G * cg_to_rear / wheelbase;
        let rear_load = mass * G * cg_to_front / wheelbase;

        Self {
            mass,
            yaw_inertia: mass * 0.2,
            cg_to_front,
            cg_to_rear,
            cornering_front: front_load * 1.05,
            cornering_rear: rear_load * (0.8 - 0.05 * (drift - 1.0)),
            peak_slip_angle: (9.0 - 0.5 * drift).to_radians(),
            handbrake_grip_loss: 0.4 + 0.03 * drift,
            max_engine_force: mass * (5.0 + 1.5 * power),
            top_speed: 40.0 + 6.0 * power,
            max_brake_force: mass * 8.0,
            handbrake_brake_force: mass * 2.5,
            drag_coefficient: 0.4,
            rolling_coefficient: 0.012 * mass * G,
            max_steer_angle: 0.5 + 0.03 * drift,
            low_speed_steer: 0.35,
            full_steer_speed: 14.0,
            yaw_damping: 1.2,
            yaw_damping_cap: 0.15,
            ride_height: 0.35,
        }
    }

    /// Steering and yaw response multiplier: `low_speed_steer` at rest,
    /// rising linearly to 1 at `full_steer_speed`.
    pub fn steering_gain(&self, speed: f32) -> f32 {
        let t = (speed / self.full_steer_speed).clamp(0.0, 1.0);
        lerp(self.low_speed_steer, 1.0, t)
    }

    /// Saturating lateral tire force for one axle.
    pub fn lateral_force(&self, peak_force: f32, slip_angle: f32) -> f32 {
        -peak_force * (slip_angle / self.peak_slip_angle).tanh()
    }
}

impl Default for CarConfig {
    fn default() -> Self {
        Self::from_spec(CarSpec::default())
    }
}

impl From<CarSpec> for CarConfig {
    fn from(spec: CarSpec) -> Self {
        Self::from_spec(spec)
    }
}
