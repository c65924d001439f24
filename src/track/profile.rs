use serde::{Deserialize, Serialize};

/// Narrowest lane any profile may produce, in meters.
pub const MIN_WIDTH: f32 = 2.0;

/// Lane width along the track as a function of normalized arc position.
pub trait WidthProfile {
    /// Width at `t` in [0, 1], given the track's nominal width.
    fn width_at(&self, t: f32, nominal: f32) -> f32;
}

impl<F> WidthProfile for F
where
    F: Fn(f32) -> f32,
{
    fn width_at(&self, t: f32, _nominal: f32) -> f32 {
        self(t)
    }
}

/// Nominal width everywhere.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Constant;

impl WidthProfile for Constant {
    fn width_at(&self, _t: f32, nominal: f32) -> f32 {
        nominal
    }
}

/// Smoothly pinches the lane between `start` and `end`.
///
/// Width eases from nominal down to `narrowest x nominal` over the first
/// quarter of the span, holds, and eases back out over the last quarter.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canyon {
    pub start: f32,
    pub end: f32,
    pub narrowest: f32,
}

impl Canyon {
    pub fn new(start: f32, end: f32, narrowest: f32) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            end: end.clamp(0.0, 1.0),
            narrowest: narrowest.clamp(0.0, 1.0),
        }
    }
}

impl WidthProfile for Canyon {
    fn width_at(&self, t: f32, nominal: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 || t <= self.start || t >= self.end {
            return nominal;
        }

        let ramp = span * 0.25;
        let into = smoothstep((t - self.start) / ramp);
        let out = smoothstep((self.end - t) / ramp);
        let pinch = into.min(out);

        nominal * (1.0 - (1.0 - self.narrowest) * pinch)
    }
}

fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Applies a profile with the global width floor and a NaN guard.
pub(crate) fn resolve_width(profile: Option<&dyn WidthProfile>, t: f32, nominal: f32) -> f32 {
    let width = match profile {
        Some(profile) => profile.width_at(t, nominal),
        None => nominal,
    };
    if width.is_finite() {
        width.max(MIN_WIDTH)
    } else {
        nominal.max(MIN_WIDTH)
    }
}
