use thiserror::Error;

/// Construction-time failures for curves and surfaces.
///
/// Queries on a built surface never fail; only building one can.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("need at least {required} control points, found {found}")]
    TooFewControlPoints { required: usize, found: usize },
    #[error("control point {index} is not finite")]
    NonFiniteControlPoint { index: usize },
    #[error("track width must be positive and finite, got {0}")]
    InvalidWidth(f32),
}
