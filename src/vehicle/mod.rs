//! Car model: configuration, per-car state, the per-tick integrator and
//! drift scoring.

mod config;
mod drift;
mod dynamics;
mod fleet;
mod state;

pub use config::{CarConfig, CarSpec, DRIFT_CONTROL_LEVELS, POWER_LEVELS};
pub use drift::{
    grade_multiplier, DriftPhase, DriftState, COMBO_BONUS, COMBO_CAP, DRIFT_MIN_SPEED,
    DRIFT_SLIP_DEG,
};
pub use dynamics::{step, LANE_MARGIN, SLIP_SPEED_FLOOR};
pub use fleet::{step_all, Car};
pub use state::{forward_from_yaw, right_from_yaw, CarState, InputSnapshot, Telemetry};
