use crate::sim::{Float3, Frame};

/// Geometry of the track surface at one arc position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackSample {
    pub position: Float3,
    pub tangent: Float3,
    pub normal: Float3,
    pub binormal: Float3,
    /// Arc length from the start of the track.
    pub distance: f32,
    /// Lane width at this sample.
    pub width: f32,
}

impl TrackSample {
    pub const fn new(position: Float3, frame: Frame, distance: f32, width: f32) -> Self {
        Self {
            position,
            tangent: frame.tangent,
            normal: frame.normal,
            binormal: frame.binormal,
            distance,
            width,
        }
    }

    pub const DEFAULT: Self = Self::new(Float3::ZERO, Frame::DEFAULT, 0.0, 0.0);

    pub fn frame(&self) -> Frame {
        Frame::new(self.tangent, self.normal, self.binormal)
    }

    /// Linear blend between two samples. Frame axes are renormalized.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::new(
            self.position.lerp(other.position, t),
            self.frame().lerp(other.frame(), t),
            self.distance + (other.distance - self.distance) * t,
            self.width + (other.width - self.width) * t,
        )
    }

    /// Signed distance of `point` from the centerline along the binormal.
    pub fn lateral_offset_of(&self, point: Float3) -> f32 {
        (point - self.position).dot(self.binormal)
    }

    /// World position `lateral` to the right and `height` above this sample.
    pub fn offset_position(&self, lateral: f32, height: f32) -> Float3 {
        self.position + self.binormal * lateral + self.normal * height
    }
}

impl Default for TrackSample {
    fn default() -> Self {
        Self::DEFAULT
    }
}
