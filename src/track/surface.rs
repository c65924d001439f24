use super::error::TrackError;
use super::profile::{resolve_width, WidthProfile};
use super::sample::TrackSample;
use super::spline::{ArcLengthTable, CatmullRom, Curve, DEFAULT_ARC_DIVISIONS};
use crate::sim::{Float3, Frame};

/// Distance-indexed track surface.
///
/// Samples are spaced uniformly in arc length, so distance lookups are O(1).
/// A surface is immutable once built; editing a track means building a new
/// one (see [`super::TrackSlot`]).
#[derive(Debug, Clone)]
pub struct TrackSurface {
    pub(super) samples: Vec<TrackSample>,
    total_length: f32,
    nominal_width: f32,
}

impl TrackSurface {
    /// Tessellates `curve` into `segments + 1` arc-uniform samples.
    ///
    /// Frames are carried from sample to sample by parallel transport, so
    /// the surface has no twist beyond what the curve itself implies.
    pub fn build(
        curve: &dyn Curve,
        nominal_width: f32,
        segments: usize,
        width_profile: Option<&dyn WidthProfile>,
    ) -> Result<Self, TrackError> {
        if !(nominal_width.is_finite() && nominal_width > 0.0) {
            return Err(TrackError::InvalidWidth(nominal_width));
        }
        let segments = if segments == 0 {
            log::warn!("track tessellation of 0 segments requested, using 1");
            1
        } else {
            segments
        };

        let table = ArcLengthTable::new(curve, (segments * 4).max(DEFAULT_ARC_DIVISIONS));
        let total_length = table.total_length();

        let mut samples = Vec::with_capacity(segments + 1);
        let mut frame: Option<Frame> = None;
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            let tangent = table.tangent_at(curve, u);

            let next = match frame {
                None => Frame::initial(tangent),
                Some(prev) => prev.transport(tangent),
            };
            frame = Some(next);

            let width = resolve_width(width_profile, u, nominal_width);
            samples.push(TrackSample::new(
                table.point_at(curve, u),
                next,
                u * total_length,
                width,
            ));
        }

        log::debug!(
            "built track surface: {} samples over {:.1} m, nominal width {:.1} m",
            samples.len(),
            total_length,
            nominal_width
        );

        Ok(Self {
            samples,
            total_length,
            nominal_width,
        })
    }

    /// Builds a centripetal Catmull-Rom curve through `points` and
    /// tessellates it.
    pub fn from_control_points(
        points: Vec<Float3>,
        closed: bool,
        nominal_width: f32,
        segments: usize,
        width_profile: Option<&dyn WidthProfile>,
    ) -> Result<Self, TrackError> {
        let curve = CatmullRom::new(points, closed)?;
        Self::build(&curve, nominal_width, segments, width_profile)
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    pub fn nominal_width(&self) -> f32 {
        self.nominal_width
    }

    /// Interpolated sample at arc distance `d`, clamped to the track.
    pub fn sample_at_distance(&self, d: f32) -> TrackSample {
        debug_assert!(
            !self.samples.is_empty(),
            "sample_at_distance called on an empty surface"
        );
        let Some(first) = self.samples.first() else {
            return TrackSample::DEFAULT;
        };
        if self.samples.len() < 2 || self.total_length <= 0.0 {
            return *first;
        }

        let d = if d.is_nan() {
            0.0
        } else {
            d.clamp(0.0, self.total_length)
        };
        let last_segment = self.samples.len() - 2;
        let f = d / self.total_length * (self.samples.len() - 1) as f32;
        let i = (f.floor() as usize).min(last_segment);
        let frac = (f - i as f32).clamp(0.0, 1.0);

        self.samples[i].lerp(&self.samples[i + 1], frac)
    }

    #[cfg(test)]
    pub(crate) fn from_samples(samples: Vec<TrackSample>, nominal_width: f32) -> Self {
        let total_length = samples.last().map_or(0.0, |s| s.distance);
        Self {
            samples,
            total_length,
            nominal_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Canyon;
    use approx::assert_relative_eq;

    const TOLERANCE: f32 = 1e-4;

    fn straight(length: f32, segments: usize) -> TrackSurface {
        TrackSurface::from_control_points(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(0.0, 0.0, length * 0.5),
                Float3::new(0.0, 0.0, length),
            ],
            false,
            24.0,
            segments,
            None,
        )
        .unwrap()
    }

    fn hilly_loop() -> TrackSurface {
        TrackSurface::from_control_points(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(80.0, 6.0, 40.0),
                Float3::new(100.0, 12.0, 140.0),
                Float3::new(20.0, 4.0, 200.0),
                Float3::new(-60.0, -2.0, 120.0),
            ],
            true,
            18.0,
            400,
            None,
        )
        .unwrap()
    }

    #[test]
    fn build_rejects_bad_width() {
        let curve = CatmullRom::new(vec![Float3::ZERO, Float3::FORWARD], false).unwrap();
        assert_eq!(
            TrackSurface::build(&curve, 0.0, 10, None).unwrap_err(),
            TrackError::InvalidWidth(0.0)
        );
        assert!(TrackSurface::build(&curve, f32::NAN, 10, None).is_err());
    }

    #[test]
    fn build_produces_segments_plus_one_samples() {
        let track = straight(100.0, 50);
        assert_eq!(track.len(), 51);
        assert_eq!(track.segment_count(), 50);
        assert_relative_eq!(track.total_length(), 100.0, epsilon = 1e-2);
    }

    #[test]
    fn build_with_zero_segments_still_has_two_samples() {
        let track = straight(100.0, 0);
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn straight_track_frames_are_upright() {
        let track = straight(100.0, 20);
        for s in track.samples() {
            assert_relative_eq!(s.tangent.z, 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.normal.y, 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.binormal.x, -1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.width, 24.0, epsilon = TOLERANCE);
        }
    }

    #[test]
    fn built_frames_are_orthonormal_and_distances_monotonic() {
        let track = hilly_loop();
        let mut prev = -1.0;
        for s in track.samples() {
            assert_relative_eq!(s.tangent.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.normal.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.binormal.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.tangent.dot(s.normal), 0.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.tangent.dot(s.binormal), 0.0, epsilon = TOLERANCE);
            assert!(s.normal.y > 0.5, "surface must stay right side up");
            assert!(s.distance >= prev);
            prev = s.distance;
        }
    }

    #[test]
    fn samples_follow_arc_length_table() {
        let curve = CatmullRom::new(
            vec![
                Float3::new(0.0, 0.0, 0.0),
                Float3::new(5.0, 1.0, 10.0),
                Float3::new(60.0, 4.0, 30.0),
                Float3::new(70.0, 2.0, 140.0),
            ],
            false,
        )
        .unwrap();
        let segments = 80;
        let track = TrackSurface::build(&curve, 16.0, segments, None).unwrap();
        let table = ArcLengthTable::new(&curve, (segments * 4).max(DEFAULT_ARC_DIVISIONS));

        for (i, s) in track.samples().iter().enumerate() {
            let u = i as f32 / segments as f32;
            let point = table.point_at(&curve, u);
            let tangent = table.tangent_at(&curve, u);
            assert_relative_eq!(s.position.x, point.x, epsilon = TOLERANCE);
            assert_relative_eq!(s.position.z, point.z, epsilon = TOLERANCE);
            assert_relative_eq!(s.tangent.dot(tangent), 1.0, epsilon = TOLERANCE);
        }

        // Uneven control spacing still yields even arc spacing.
        let gaps: Vec<f32> = track
            .samples()
            .windows(2)
            .map(|w| (w[1].position - w[0].position).magnitude())
            .collect();
        let mean = track.total_length() / segments as f32;
        for gap in gaps {
            assert_relative_eq!(gap, mean, epsilon = mean * 0.05);
        }
    }

    #[test]
    fn sample_at_distance_clamps_out_of_range() {
        let track = straight(100.0, 50);
        let before = track.sample_at_distance(-10.0);
        let after = track.sample_at_distance(1e6);

        assert_relative_eq!(before.distance, 0.0, epsilon = TOLERANCE);
        assert_relative_eq!(before.position.z, 0.0, epsilon = 1e-2);
        assert_relative_eq!(after.distance, track.total_length(), epsilon = TOLERANCE);
        assert_relative_eq!(after.position.z, 100.0, epsilon = 1e-2);
    }

    #[test]
    fn sample_at_distance_interpolates_between_samples() {
        let track = straight(100.0, 10);
        let s = track.sample_at_distance(35.0);
        assert_relative_eq!(s.distance, 35.0, epsilon = 1e-2);
        assert_relative_eq!(s.position.z, 35.0, epsilon = 1e-2);
    }

    #[test]
    fn sample_at_distance_yields_unit_frames_and_monotonic_distance() {
        let track = hilly_loop();
        let mut prev = -1.0;
        let steps = 997;
        for i in 0..=steps {
            let d = track.total_length() * i as f32 / steps as f32;
            let s = track.sample_at_distance(d);
            assert_relative_eq!(s.tangent.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.normal.magnitude(), 1.0, epsilon = TOLERANCE);
            assert_relative_eq!(s.binormal.magnitude(), 1.0, epsilon = TOLERANCE);
            assert!(s.distance >= prev);
            prev = s.distance;
        }
    }

    #[test]
    fn width_profile_narrows_samples() {
        let canyon = Canyon::new(0.25, 0.75, 0.5);
        let curve = CatmullRom::new(
            vec![Float3::ZERO, Float3::new(0.0, 0.0, 200.0)],
            false,
        )
        .unwrap();
        let track = TrackSurface::build(&curve, 20.0, 100, Some(&canyon)).unwrap();

        assert_relative_eq!(track.sample_at_distance(10.0).width, 20.0, epsilon = TOLERANCE);
        assert_relative_eq!(
            track.sample_at_distance(track.total_length() * 0.5).width,
            10.0,
            epsilon = 1e-2
        );
    }

    #[test]
    fn single_sample_surface_returns_it() {
        let only = TrackSample::new(Float3::new(1.0, 2.0, 3.0), Frame::DEFAULT, 0.0, 12.0);
        let track = TrackSurface::from_samples(vec![only], 12.0);
        assert_eq!(track.sample_at_distance(50.0), only);
    }
}
