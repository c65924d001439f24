use super::error::TrackError;
use crate::sim::Float3;

/// Number of chord divisions used for arc-length tables by default.
pub const DEFAULT_ARC_DIVISIONS: usize = 200;

/// A smooth parametric 3D curve over `t` in [0, 1].
///
/// Parameter speed is arbitrary; [`ArcLengthTable`] maps uniform arc
/// positions back onto `t`.
pub trait Curve {
    fn point(&self, t: f32) -> Float3;

    /// Unit direction of travel at `t`. The default uses central differences.
    fn tangent(&self, t: f32) -> Float3 {
        const DELTA: f32 = 1e-4;
        let t1 = (t - DELTA).max(0.0);
        let t2 = (t + DELTA).min(1.0);
        (self.point(t2) - self.point(t1)).normalize_or(Float3::FORWARD)
    }
}

impl<C: Curve + ?Sized> Curve for &C {
    fn point(&self, t: f32) -> Float3 {
        (**self).point(t)
    }

    fn tangent(&self, t: f32) -> Float3 {
        (**self).tangent(t)
    }
}

/// Cumulative chord lengths of a curve sampled at uniform `t`.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    lengths: Vec<f32>,
}

impl ArcLengthTable {
    pub fn new(curve: &dyn Curve, divisions: usize) -> Self {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        lengths.push(0.0);

        let mut prev = curve.point(0.0);
        let mut sum = 0.0;
        for i in 1..=divisions {
            let p = curve.point(i as f32 / divisions as f32);
            sum += (p - prev).magnitude();
            lengths.push(sum);
            prev = p;
        }

        Self { lengths }
    }

    pub fn total_length(&self) -> f32 {
        self.lengths[self.lengths.len() - 1]
    }

    /// Maps a normalized arc position `u` in [0, 1] to the curve parameter.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let total = self.total_length();
        let divisions = self.lengths.len() - 1;
        if total <= 0.0 {
            return u.clamp(0.0, 1.0);
        }

        let target = u.clamp(0.0, 1.0) * total;
        if target <= 0.0 {
            return 0.0;
        }
        if target >= total {
            return 1.0;
        }

        // Find [lo, lo+1] with lengths[lo] <= target < lengths[lo+1]
        let mut lo = 0usize;
        let mut hi = divisions;
        while lo < hi - 1 {
            let mid = (lo + hi) / 2;
            if self.lengths[mid] <= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let seg_len = self.lengths[lo + 1] - self.lengths[lo];
        let frac = if seg_len > 0.0 {
            (target - self.lengths[lo]) / seg_len
        } else {
            0.0
        };
        (lo as f32 + frac) / divisions as f32
    }

    pub fn point_at(&self, curve: &dyn Curve, u: f32) -> Float3 {
        curve.point(self.u_to_t(u))
    }

    pub fn tangent_at(&self, curve: &dyn Curve, u: f32) -> Float3 {
        curve.tangent(self.u_to_t(u))
    }
}

/// Centripetal Catmull-Rom spline through a list of control points.
///
/// Knot spacing uses the square root of chord length, which avoids cusps
/// and self-intersections on unevenly spaced points. Open curves extend
/// past their ends with mirrored phantom points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Float3>,
    closed: bool,
}

/// Cubic coefficients of one spline segment in local parameter w in [0, 1].
#[derive(Debug, Copy, Clone)]
struct Cubic {
    c0: Float3,
    c1: Float3,
    c2: Float3,
    c3: Float3,
}

impl Cubic {
    fn hermite(x1: Float3, x2: Float3, t1: Float3, t2: Float3) -> Self {
        Self {
            c0: x1,
            c1: t1,
            c2: x1 * -3.0 + x2 * 3.0 - t1 * 2.0 - t2,
            c3: x1 * 2.0 - x2 * 2.0 + t1 + t2,
        }
    }

    fn eval(&self, w: f32) -> Float3 {
        let w2 = w * w;
        self.c0 + self.c1 * w + self.c2 * w2 + self.c3 * (w2 * w)
    }

    fn derivative(&self, w: f32) -> Float3 {
        self.c1 + self.c2 * (2.0 * w) + self.c3 * (3.0 * w * w)
    }
}

impl CatmullRom {
    pub fn new(points: Vec<Float3>, closed: bool) -> Result<Self, TrackError> {
        let required = if closed { 3 } else { 2 };
        if points.len() < required {
            return Err(TrackError::TooFewControlPoints {
                required,
                found: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(TrackError::NonFiniteControlPoint { index });
        }
        Ok(Self { points, closed })
    }

    pub fn points(&self) -> &[Float3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Segment index and local weight for a global parameter.
    fn locate(&self, t: f32) -> (usize, f32) {
        let n = self.points.len();
        let spans = if self.closed { n } else { n - 1 };
        let p = t.clamp(0.0, 1.0) * spans as f32;
        let mut index = p.floor() as usize;
        let mut weight = p - index as f32;
        if index >= spans {
            index = spans - 1;
            weight = 1.0;
        }
        (index, weight)
    }

    fn control(&self, index: isize) -> Float3 {
        let n = self.points.len() as isize;
        if self.closed {
            return self.points[index.rem_euclid(n) as usize];
        }
        if index < 0 {
            return self.points[0] * 2.0 - self.points[1];
        }
        if index >= n {
            let last = self.points[(n - 1) as usize];
            return last * 2.0 - self.points[(n - 2) as usize];
        }
        self.points[index as usize]
    }

    fn segment(&self, index: usize) -> Cubic {
        let i = index as isize;
        let p0 = self.control(i - 1);
        let p1 = self.control(i);
        let p2 = self.control(i + 1);
        let p3 = self.control(i + 2);

        let knot = |a: Float3, b: Float3| a.distance_squared(b).powf(0.25);
        let mut dt1 = knot(p1, p2);
        let mut dt0 = knot(p0, p1);
        let mut dt2 = knot(p2, p3);

        // Coincident points collapse a knot interval; borrow a neighbour.
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) * (1.0 / dt0) - (p2 - p0) * (1.0 / (dt0 + dt1))
            + (p2 - p1) * (1.0 / dt1))
            * dt1;
        let t2 = ((p2 - p1) * (1.0 / dt1) - (p3 - p1) * (1.0 / (dt1 + dt2))
            + (p3 - p2) * (1.0 / dt2))
            * dt1;

        Cubic::hermite(p1, p2, t1, t2)
    }
}

impl Curve for CatmullRom {
    fn point(&self, t: f32) -> Float3 {
        let (index, weight) = self.locate(t);
        self.segment(index).eval(weight)
    }

    fn tangent(&self, t: f32) -> Float3 {
        let (index, weight) = self.locate(t);
        let d = self.segment(index).derivative(weight);
        let fallback = (self.control(index as isize + 1) - self.control(index as isize))
            .normalize_or(Float3::FORWARD);
        d.normalize_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    fn straight() -> CatmullRom {
        CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, 50.0),
                Float3::new(0.0, 0.0, 100.0),
            ],
            false,
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_too_few_points() {
        let err = CatmullRom::new(vec![Float3::ZERO], false).unwrap_err();
        assert_eq!(
            err,
            TrackError::TooFewControlPoints {
                required: 2,
                found: 1
            }
        );

        let err = CatmullRom::new(vec![Float3::ZERO, Float3::UP], true).unwrap_err();
        assert!(matches!(err, TrackError::TooFewControlPoints { required: 3, .. }));
    }

    #[test]
    fn new_rejects_non_finite_points() {
        let err = CatmullRom::new(vec![Float3::ZERO, Float3::new(f32::NAN, 0.0, 0.0)], false)
            .unwrap_err();
        assert_eq!(err, TrackError::NonFiniteControlPoint { index: 1 });
    }

    #[test]
    fn interpolates_control_points() {
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(10.0, 2.0, 30.0),
                Float3::new(-5.0, 0.0, 60.0),
                Float3::new(0.0, -3.0, 90.0),
            ],
            false,
        )
        .unwrap();

        for (i, expected) in curve.points().iter().enumerate() {
            let p = curve.point(i as f32 / 3.0);
            assert_relative_eq!(p.x, expected.x, epsilon = TOLERANCE);
            assert_relative_eq!(p.y, expected.y, epsilon = TOLERANCE);
            assert_relative_eq!(p.z, expected.z, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn straight_points_give_straight_curve() {
        let curve = straight();
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let p = curve.point(t);
            assert_relative_eq!(p.x, 0.0, epsilon = TOLERANCE);
            assert_relative_eq!(p.y, 0.0, epsilon = TOLERANCE);

            let tangent = curve.tangent(t);
            assert_relative_eq!(tangent.z, 1.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn closed_curve_wraps_to_start() {
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(50.0, 0.0, 50.0),
                Float3::new(0.0, 0.0, 100.0),
                Float3::new(-50.0, 0.0, 50.0),
            ],
            true,
        )
        .unwrap();

        let start = curve.point(0.0);
        let end = curve.point(1.0);
        assert_relative_eq!(start.x, end.x, epsilon = TOLERANCE);
        assert_relative_eq!(start.z, end.z, epsilon = TOLERANCE);
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, 10.0),
            ],
            false,
        )
        .unwrap();

        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!(curve.point(t).is_finite());
            assert!(curve.tangent(t).is_finite());
        }
    }

    #[test]
    fn arc_length_of_straight_line() {
        let curve = straight();
        let table = ArcLengthTable::new(&curve, DEFAULT_ARC_DIVISIONS);
        assert_relative_eq!(table.total_length(), 100.0, epsilon = 1e-2);
    }

    #[test]
    fn u_to_t_is_monotonic_and_bounded() {
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, 5.0),
                Float3::new(40.0, 0.0, 80.0),
            ],
            false,
        )
        .unwrap();
        let table = ArcLengthTable::new(&curve, 64);

        assert_eq!(table.u_to_t(-1.0), 0.0);
        assert_eq!(table.u_to_t(2.0), 1.0);

        let mut prev = 0.0;
        for i in 0..=50 {
            let t = table.u_to_t(i as f32 / 50.0);
            assert!(t >= prev);
            prev = t;
        }
    }

    #[test]
    fn point_at_spaces_uneven_segments_evenly() {
        // Control spacing 10 then 90: uniform t would crowd the short span.
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, 10.0),
                Float3::new(0.0, 0.0, 100.0),
            ],
            false,
        )
        .unwrap();
        let table = ArcLengthTable::new(&curve, DEFAULT_ARC_DIVISIONS);
        let mid = table.point_at(&curve, 0.5);
        assert_relative_eq!(mid.z, 0.5 * table.total_length(), epsilon = 0.5);
    }
}
