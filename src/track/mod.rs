//! Track geometry: curves, the distance-indexed surface and projection.
//!
//! A [`TrackSurface`] is built once from a smooth curve and then answers
//! two kinds of queries: sample at an arc distance, and nearest point to a
//! world position.

mod error;
mod profile;
mod projection;
mod sample;
mod slot;
mod spline;
mod surface;

pub use error::TrackError;
pub use profile::{Canyon, Constant, WidthProfile, MIN_WIDTH};
pub use projection::{closest_on_segment, ProjectionResult};
pub use sample::TrackSample;
pub use slot::TrackSlot;
pub use spline::{ArcLengthTable, CatmullRom, Curve, DEFAULT_ARC_DIVISIONS};
pub use surface::TrackSurface;
