use std::f32::consts::PI;

pub const G: f32 = 9.81;
pub const EPSILON: f32 = 1.192_093e-7;

/// Largest step the integrator is meant to see (20 Hz floor).
pub const MAX_DT: f32 = 0.05;

/// Wraps an angle into (-PI, PI].
pub fn wrap_angle(rad: f32) -> f32 {
    if rad > -PI && rad <= PI {
        return rad;
    }
    if !rad.is_finite() {
        return 0.0;
    }
    let wrapped = (rad + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Sign with `sign(0) == 0`.
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Sign that treats zero as positive, for forces that must act at rest.
pub fn sign_or_positive(x: f32) -> f32 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps with NaN mapped to zero before clamping.
pub fn clamp_finite(x: f32, min: f32, max: f32) -> f32 {
    if x.is_nan() {
        return 0.0_f32.clamp(min, max);
    }
    x.clamp(min, max)
}

/// Moves `value` toward zero by `amount` without crossing it.
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

/// Clock-port helper: bounds a raw frame delta to `[0, max_dt]`.
pub fn clamp_dt(raw: f32, max_dt: f32) -> f32 {
    clamp_finite(raw, 0.0, max_dt)
}
