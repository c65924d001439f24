use super::sample::TrackSample;
use super::surface::TrackSurface;
use crate::sim::Float3;

/// Segments shorter than this (squared, m^2) are skipped by projection.
const DEGENERATE_SEGMENT_SQ: f32 = 1e-10;

/// Closest point on the track centerline to a query position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionResult {
    /// Sample interpolated at the closest point.
    pub sample: TrackSample,
    /// Index of the first sample of the closest segment.
    pub segment: usize,
    /// Fraction along the segment, in [0, 1].
    pub t: f32,
    /// The closest point itself.
    pub projected: Float3,
}

impl ProjectionResult {
    fn at_sample(sample: TrackSample, segment: usize) -> Self {
        Self {
            sample,
            segment,
            t: 0.0,
            projected: sample.position,
        }
    }

    /// Squared distance from `point` to the projected point.
    pub fn distance_squared_to(&self, point: Float3) -> f32 {
        point.distance_squared(self.projected)
    }
}

/// Closest point on segment `a`-`b` to `p`: (clamped t, squared distance).
///
/// `None` for degenerate zero-length segments.
pub fn closest_on_segment(a: Float3, b: Float3, p: Float3) -> Option<(f32, f32)> {
    let ab = b - a;
    let len_sq = ab.magnitude_squared();
    if len_sq < DEGENERATE_SEGMENT_SQ {
        return None;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    Some((t, p.distance_squared(closest)))
}

impl TrackSurface {
    /// Nearest point on the sample polyline to `point`.
    ///
    /// Exhaustive O(N) scan over every segment. Fine for the few thousand
    /// segments a track has; a spatial index could replace the scan behind
    /// the same signature.
    pub fn project_point(&self, point: Float3) -> ProjectionResult {
        debug_assert!(
            !self.samples.is_empty(),
            "project_point called on an empty surface"
        );
        let Some(first) = self.samples.first() else {
            return ProjectionResult::at_sample(TrackSample::DEFAULT, 0);
        };
        if self.samples.len() < 2 {
            return ProjectionResult::at_sample(*first, 0);
        }

        let mut best: Option<(usize, f32, f32)> = None;
        for (i, pair) in self.samples.windows(2).enumerate() {
            let Some((t, dist_sq)) = closest_on_segment(pair[0].position, pair[1].position, point)
            else {
                continue;
            };
            if best.map_or(true, |(_, _, best_sq)| dist_sq < best_sq) {
                best = Some((i, t, dist_sq));
            }
        }

        match best {
            Some((segment, t, _)) => {
                let sample = self.samples[segment].lerp(&self.samples[segment + 1], t);
                ProjectionResult {
                    sample,
                    segment,
                    t,
                    projected: sample.position,
                }
            }
            None => {
                // Every segment collapsed to a point; use the nearest sample.
                let (segment, nearest) = self
                    .samples
                    .iter()
                    .enumerate()
                    .min_by(|(_, a), (_, b)| {
                        a.position
                            .distance_squared(point)
                            .total_cmp(&b.position.distance_squared(point))
                    })
                    .map(|(i, s)| (i.min(self.samples.len() - 2), *s))
                    .unwrap_or((0, *first));
                ProjectionResult::at_sample(nearest, segment)
            }
        }
    }
}
