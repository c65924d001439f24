use super::math::{Float3, Quaternion};
use super::physics::{wrap_angle, EPSILON};

/// Orthonormal coordinate frame along the track.
///
/// Right-handed: `tangent × normal = binormal`.
/// - `tangent`: forward along the curve
/// - `normal`: surface-up
/// - `binormal`: surface-right
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub tangent: Float3,
    pub normal: Float3,
    pub binormal: Float3,
}

impl Frame {
    pub const fn new(tangent: Float3, normal: Float3, binormal: Float3) -> Self {
        Self {
            tangent,
            normal,
            binormal,
        }
    }

    pub const DEFAULT: Self = Self::new(Float3::FORWARD, Float3::UP, Float3::RIGHT);

    /// Builds a frame from a tangent and an approximate up vector.
    ///
    /// The tangent is kept exactly; `up_hint` only picks the roll.
    pub fn from_tangent_up(tangent: Float3, up_hint: Float3) -> Self {
        let tangent = tangent.normalize_or(Float3::FORWARD);
        let binormal = tangent.cross(up_hint).normalize_or(Float3::RIGHT);
        let normal = binormal.cross(tangent).normalize();
        Self::new(tangent, normal, binormal)
    }

    /// Seed frame for the start of a curve: world up, unless the tangent is
    /// close to vertical, in which case world forward stands in for up.
    pub fn initial(tangent: Float3) -> Self {
        let tangent = tangent.normalize_or(Float3::FORWARD);
        let hint = if tangent.dot(Float3::UP).abs() > 0.99 {
            if tangent.dot(Float3::FORWARD).abs() > 0.99 {
                Float3::RIGHT
            } else {
                Float3::FORWARD
            }
        } else {
            Float3::UP
        };
        Self::from_tangent_up(tangent, hint)
    }

    /// Carries this frame to the next tangent by parallel transport.
    ///
    /// The normal is rotated by the shortest arc taking the current tangent
    /// onto `next_tangent`, so straight runs keep their roll exactly and no
    /// sign flip appears where curvature vanishes. A degenerate
    /// `next_tangent` keeps the current frame.
    pub fn transport(self, next_tangent: Float3) -> Self {
        let next = next_tangent.normalize();
        if next == Float3::ZERO {
            return self;
        }

        let rotation = Quaternion::from_rotation_arc(self.tangent, next, EPSILON);
        let carried = rotation.mul_vec(self.normal);

        let binormal = next.cross(carried).normalize();
        if binormal == Float3::ZERO {
            // Tangent flipped onto the carried normal; restart from world up.
            log::warn!("frame transport degenerated at tangent {next:?}, reseeding");
            return Self::initial(next);
        }
        let normal = binormal.cross(next).normalize();
        Self::new(next, normal, binormal)
    }

    /// Component-wise blend of two frames, each axis renormalized.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.tangent.lerp(other.tangent, t).normalize_or(self.tangent),
            self.normal.lerp(other.normal, t).normalize_or(self.normal),
            self.binormal.lerp(other.binormal, t).normalize_or(self.binormal),
        )
    }

    /// Heading of the tangent on the ground plane, in the yaw convention
    /// used by the vehicle (0 faces +Z, positive turns right), in (-PI, PI].
    pub fn heading(self) -> f32 {
        // atan2 yields exactly -PI for a -Z tangent with a -0.0 x component.
        wrap_angle((-self.tangent.x).atan2(self.tangent.z))
    }

    /// Slope of the tangent as a percent grade (rise over run x 100).
    pub fn grade_percent(self) -> f32 {
        grade_percent(self.tangent)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rise over horizontal run of a direction, in percent.
pub fn grade_percent(tangent: Float3) -> f32 {
    let run = (tangent.x * tangent.x + tangent.z * tangent.z)
        .sqrt()
        .max(1e-3);
    tangent.y / run * 100.0
}
