//! DriftEngine - arcade drift-racing simulation core.
//!
//! # Architecture
//!
//! Layered modules with strict inward-only dependencies:
//!
//! - **sim**: Math primitives (Float3, Float2, Quaternion, Frame) and physics helpers
//! - **track**: Curves, distance-indexed track surfaces, projection, width profiles
//! - **vehicle**: Car tuning, per-tick bicycle-model integrator, drift scoring
//! - **config**: TOML configuration for hosts
//!
//! # Usage
//!
//! ```ignore
//! use driftengine::{step, CarConfig, CarState, InputSnapshot, SimConfig};
//!
//! let config = SimConfig::load("sim.toml")?;
//! let track = config.build_track()?;
//! let car_config = config.car_config();
//! let mut car = CarState::spawn(&track, 0.0, 0.0, &car_config);
//! let telemetry = step(&mut car, &InputSnapshot::default(), &track, &car_config, 1.0 / 60.0);
//! ```

pub mod config;
pub mod sim;
pub mod track;
pub mod vehicle;

// Re-export commonly used types at crate root
pub use config::{ConfigError, SimConfig};
pub use sim::{Float2, Float3, Frame, Quaternion};
pub use track::{ProjectionResult, TrackError, TrackSample, TrackSlot, TrackSurface};
pub use vehicle::{
    step, step_all, Car, CarConfig, CarSpec, CarState, DriftPhase, DriftState, InputSnapshot,
    Telemetry,
};
