//! Pure math primitives shared by the track and vehicle layers.
//!
//! Vector types, the orthonormal track frame and the
//! physics constants used by the integrator.

mod frame;
mod math;

pub mod physics;

pub use frame::{grade_percent, Frame};
pub use math::{Float2, Float3, Quaternion};
pub use physics::{clamp_dt, wrap_angle, EPSILON, G, MAX_DT};
